//! Target languages the snippet service can generate.

use serde::{Deserialize, Serialize};

/// How the snippet endpoint is addressed for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointVariant {
    /// Bare endpoint, no query parameters.
    Default,
    /// `?lang=<language>`.
    LanguageTagged,
    /// `?lang=<language>&generation=openapi`.
    LanguageTaggedOpenApi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SnippetLanguage {
    #[default]
    #[serde(rename = "powershell")]
    PowerShell,
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "c#")]
    CSharp,
    #[serde(rename = "javascript")]
    JavaScript,
    #[serde(rename = "java")]
    Java,
    #[serde(rename = "objective-c")]
    ObjectiveC,
    #[serde(rename = "go")]
    Go,
}

impl SnippetLanguage {
    pub const ALL: [SnippetLanguage; 7] = [
        SnippetLanguage::PowerShell,
        SnippetLanguage::Python,
        SnippetLanguage::CSharp,
        SnippetLanguage::JavaScript,
        SnippetLanguage::Java,
        SnippetLanguage::ObjectiveC,
        SnippetLanguage::Go,
    ];

    /// Key the snippet service understands (`lang` query value).
    pub fn key(self) -> &'static str {
        match self {
            SnippetLanguage::PowerShell => "powershell",
            SnippetLanguage::Python => "python",
            SnippetLanguage::CSharp => "c#",
            SnippetLanguage::JavaScript => "javascript",
            SnippetLanguage::Java => "java",
            SnippetLanguage::ObjectiveC => "objective-c",
            SnippetLanguage::Go => "go",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SnippetLanguage::PowerShell => "PowerShell",
            SnippetLanguage::Python => "Python",
            SnippetLanguage::CSharp => "C#",
            SnippetLanguage::JavaScript => "JavaScript",
            SnippetLanguage::Java => "Java",
            SnippetLanguage::ObjectiveC => "Objective-C",
            SnippetLanguage::Go => "Go",
        }
    }

    /// Extension of the saved script file.
    pub fn file_extension(self) -> &'static str {
        match self {
            SnippetLanguage::PowerShell => "ps1",
            SnippetLanguage::Python => "py",
            SnippetLanguage::CSharp => "cs",
            SnippetLanguage::JavaScript => "js",
            SnippetLanguage::Java => "java",
            SnippetLanguage::ObjectiveC => "c",
            SnippetLanguage::Go => "go",
        }
    }

    pub fn endpoint_variant(self) -> EndpointVariant {
        match self {
            SnippetLanguage::JavaScript | SnippetLanguage::Java | SnippetLanguage::ObjectiveC => {
                EndpointVariant::LanguageTagged
            }
            SnippetLanguage::Go | SnippetLanguage::PowerShell | SnippetLanguage::Python => {
                EndpointVariant::LanguageTaggedOpenApi
            }
            SnippetLanguage::CSharp => EndpointVariant::Default,
        }
    }
}

impl std::fmt::Display for SnippetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for SnippetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let alias = match wanted.as_str() {
            "csharp" | "cs" => "c#",
            "ps" | "pwsh" | "ps1" => "powershell",
            "js" => "javascript",
            "objc" => "objective-c",
            "py" => "python",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|l| l.key() == alias)
            .ok_or_else(|| format!("unknown language '{s}'"))
    }
}
