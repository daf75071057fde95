//! Diagram source text and notation selection.

use serde::Deserialize;

/// A diagram source dialect.
///
/// The notation selects which layout engine turns the source text into a
/// rendered surface, and which sketch mode applies when sketch styling is
/// enabled (replace for [`Graph`](Notation::Graph), overlay for
/// [`Process`](Notation::Process)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    /// Simple directed-graph notation (`A-->B` edge lists)
    Graph,
    /// Process-flow notation (tasks, events, gateways, flows)
    Process,
}

impl Notation {
    /// Returns a human-readable name for this notation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::Process => "process",
        }
    }
}

impl std::str::FromStr for Notation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "graph" => Ok(Self::Graph),
            "process" => Ok(Self::Process),
            other => Err(format!("unknown notation `{other}`")),
        }
    }
}

/// The textual input of one render cycle: notation plus source text.
///
/// Owned by the surrounding shell; the renderer only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSource {
    notation: Notation,
    text: String,
}

impl DiagramSource {
    /// Creates a new diagram source.
    ///
    /// # Examples
    ///
    /// ```
    /// use scrawl::source::{DiagramSource, Notation};
    ///
    /// let source = DiagramSource::new(Notation::Graph, "A-->B; A-->C");
    /// assert_eq!(source.notation(), Notation::Graph);
    /// ```
    pub fn new(notation: Notation, text: impl Into<String>) -> Self {
        Self {
            notation,
            text: text.into(),
        }
    }

    pub fn notation(&self) -> Notation {
        self.notation
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
