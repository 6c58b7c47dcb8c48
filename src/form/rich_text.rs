use serde::Serialize;

use crate::util::text::plain_text;

/// Insertable description blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Goal,
    Scope,
    InScope,
    OutScope,
    Outcomes,
    Feature,
}

impl TemplateKind {
    pub fn parse(s: &str) -> Option<TemplateKind> {
        match s {
            "goal" => Some(TemplateKind::Goal),
            "scope" => Some(TemplateKind::Scope),
            "inScope" | "in-scope" => Some(TemplateKind::InScope),
            "outScope" | "out-scope" => Some(TemplateKind::OutScope),
            "outcomes" => Some(TemplateKind::Outcomes),
            "feature" => Some(TemplateKind::Feature),
            _ => None,
        }
    }

    pub fn html(self) -> String {
        match self {
            TemplateKind::Goal => {
                "<p><strong>Goal:</strong></p><p>Write the primary goal here...</p>".to_string()
            }
            TemplateKind::Scope => task_list_block("Scope:", &["In scope item 1", "In scope item 2"]),
            TemplateKind::InScope => task_list_block("Scope:", &["In scope item"]),
            TemplateKind::OutScope => task_list_block("Out of Scope:", &[""]),
            TemplateKind::Outcomes => {
                "<p><strong>Expected Outcomes:</strong></p><ol><li><p></p></li></ol>".to_string()
            }
            TemplateKind::Feature => {
                "<p><strong>Key feature:</strong></p><ul><li><p></p></li></ul>".to_string()
            }
        }
    }
}

fn task_list_block(heading: &str, items: &[&str]) -> String {
    let mut html = format!("<p><strong>{}</strong></p><ul data-type=\"taskList\">", heading);
    for item in items {
        html.push_str(&format!(
            "<li data-type=\"taskItem\" data-checked=\"false\"><p>{}</p></li>",
            item
        ));
    }
    html.push_str("</ul>");
    html
}

/// Which headed sections the description already has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SectionFlags {
    pub goal: bool,
    /// Also set by "Out of Scope:", which contains "Scope:"
    pub scope: bool,
    pub out_scope: bool,
    pub outcomes: bool,
    pub feature: bool,
}

impl SectionFlags {
    pub fn from_html(html: &str) -> Self {
        let text = plain_text(html);
        SectionFlags {
            goal: text.contains("Goal:"),
            scope: text.contains("Scope:"),
            out_scope: text.contains("Out of Scope:"),
            outcomes: text.contains("Expected Outcomes:"),
            feature: text.contains("Key feature:"),
        }
    }
}

/// Editor-side copy of a description owned by a form.
///
/// The form holds the authoritative HTML. External changes are pushed in
/// with [`sync_from_external`](Self::sync_from_external); user edits come
/// back out of [`on_update`](Self::on_update).
#[derive(Debug, Clone, Default)]
pub struct RichTextEditor {
    html: String,
    sections: SectionFlags,
}

impl RichTextEditor {
    pub fn new(html: &str) -> Self {
        RichTextEditor {
            html: html.to_string(),
            sections: SectionFlags::from_html(html),
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn sections(&self) -> SectionFlags {
        self.sections
    }

    /// Replace the content with an external value. Returns false, and
    /// leaves the editor untouched, when the value is absent or already
    /// equal to the current content.
    pub fn sync_from_external(&mut self, value: Option<&str>) -> bool {
        match value {
            Some(v) if v != self.html => {
                self.html = v.to_string();
                self.sections = SectionFlags::from_html(v);
                true
            }
            _ => false,
        }
    }

    /// A user edit. Returns the HTML to hand back to the owner.
    pub fn on_update(&mut self, html: &str) -> &str {
        self.html = html.to_string();
        self.sections = SectionFlags::from_html(html);
        &self.html
    }

    /// Append a template block at the end of the content.
    pub fn insert_template(&mut self, kind: TemplateKind) -> &str {
        let next = format!("{}{}", self.html, kind.html());
        self.on_update(&next)
    }
}
