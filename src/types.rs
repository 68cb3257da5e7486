use serde::{Deserialize, Serialize};

/// Writing tone selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Tone {
    Professional,
    Friendly,
    Smart,
    Storytelling,
}

impl std::str::FromStr for Tone {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Professional" => Ok(Self::Professional),
            "Friendly" => Ok(Self::Friendly),
            "Smart" => Ok(Self::Smart),
            "Storytelling" => Ok(Self::Storytelling),
            _ => Err(()),
        }
    }
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::Friendly => "Friendly",
            Self::Smart => "Smart",
            Self::Storytelling => "Storytelling",
        }
    }
}

/// Target post length. Each maps to a character range the prompt enforces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum PostLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl std::str::FromStr for PostLength {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Short" => Ok(Self::Short),
            "Medium" => Ok(Self::Medium),
            "Long" => Ok(Self::Long),
            _ => Err(()),
        }
    }
}

impl PostLength {
    /// Character range the model is asked to stay within.
    pub fn char_range(&self) -> (u32, u32) {
        match self {
            Self::Short => (600, 900),
            Self::Medium => (900, 1200),
            Self::Long => (1200, 1500),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "Short",
            Self::Medium => "Medium",
            Self::Long => "Long",
        }
    }
}

/// One generated post variant as the model returns it. Fields the model
/// omits deserialize as empty strings; the model is trusted beyond that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDraft {
    #[serde(default)]
    pub hook: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub cta: String,
    #[serde(default)]
    pub full: String,
    #[serde(default)]
    pub hashtags: String,
}

impl PostDraft {
    /// Display text: the model-supplied `full` when present, otherwise
    /// derived as hook + body + cta separated by blank lines.
    pub fn full_text(&self) -> String {
        if !self.full.is_empty() {
            return self.full.clone();
        }
        format!("{}\n\n{}\n\n{}", self.hook, self.body, self.cta)
    }
}

/// Payload shape the post-generation prompt asks the model for.
#[derive(Debug, Deserialize)]
pub struct PostsPayload {
    #[serde(default)]
    pub posts: Vec<PostDraft>,
}

/// One generated hook variant (≤140 chars requested).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookVariant {
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub content: String,
}

/// Payload shape the hook-generation prompt asks the model for.
#[derive(Debug, Deserialize)]
pub struct HooksPayload {
    #[serde(default)]
    pub hooks: Vec<HookVariant>,
}
