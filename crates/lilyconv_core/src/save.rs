use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Stem used when the document has never been saved.
const UNTITLED_STEM: &str = "untitled";

/// The result views of the conversion dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTab {
    Messages,
    HtmlDiff,
    UnifiedDiff,
}

impl ResultTab {
    pub const ALL: [ResultTab; 3] = [
        ResultTab::Messages,
        ResultTab::HtmlDiff,
        ResultTab::UnifiedDiff,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn tag(self) -> &'static str {
        match self {
            ResultTab::Messages => "message",
            ResultTab::HtmlDiff => "html-diff",
            ResultTab::UnifiedDiff => "uni-diff",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ResultTab::Messages => "txt",
            ResultTab::HtmlDiff => "html",
            ResultTab::UnifiedDiff => "diff",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ResultTab::Messages => "Messages",
            ResultTab::HtmlDiff => "Changes",
            ResultTab::UnifiedDiff => "Diff",
        }
    }
}

/// Snapshot of one result view, ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub tab: ResultTab,
    pub text: String,
}

impl FileInfo {
    pub fn new(tab: ResultTab, text: impl Into<String>) -> Self {
        Self {
            tab,
            text: text.into(),
        }
    }

    /// `<dir>/<stem>[<tag>].<ext>` next to the document.
    pub fn target_path(&self, document: Option<&Path>) -> PathBuf {
        let (dir, stem) = match document.and_then(|p| p.file_stem().map(|s| (p.parent(), s))) {
            Some((dir, stem)) => (dir.map(Path::to_path_buf), stem.to_os_string()),
            None => (None, OsString::from(UNTITLED_STEM)),
        };
        let mut name = stem;
        name.push(format!("[{}].{}", self.tab.tag(), self.tab.extension()));
        match dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}
