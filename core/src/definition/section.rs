/// Section terminator: a blank line followed by the next bold marker.
const SECTION_END: &str = "\n\n**";

/// The five labels a definition document may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Role,
    Goal,
    Backstory,
    Description,
    ExpectedOutput,
}

impl Label {
    pub const ALL: [Label; 5] = [
        Label::Role,
        Label::Goal,
        Label::Backstory,
        Label::Description,
        Label::ExpectedOutput,
    ];

    /// Text between the `**` and `:**` of the marker.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Role => "Role",
            Label::Goal => "Goal",
            Label::Backstory => "Backstory",
            Label::Description => "Description",
            Label::ExpectedOutput => "Expected Output",
        }
    }

    /// Field name used in records and error messages.
    pub fn field_name(&self) -> &'static str {
        match self {
            Label::Role => "role",
            Label::Goal => "goal",
            Label::Backstory => "backstory",
            Label::Description => "description",
            Label::ExpectedOutput => "expected_output",
        }
    }

    pub fn extract(&self, document: &str) -> String {
        extract_section(self.as_str(), document)
    }
}

/// Returns the trimmed text following `**{label}:**`, or an empty string when the
/// marker does not occur.
///
/// Only the first occurrence of the marker is considered. The section ends at the
/// first blank line followed by `**`, or at the end of the document.
pub fn extract_section(label: &str, document: &str) -> String {
    let marker = format!("**{label}:**");
    let Some(pos) = document.find(&marker) else {
        return String::new();
    };

    let body = &document[pos + marker.len()..];
    let end = body.find(SECTION_END).unwrap_or(body.len());
    body[..end].trim().to_string()
}
