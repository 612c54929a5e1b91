//! Importer dialog: a static option table turned into command-line flags.

use std::path::{Path, PathBuf};

use crate::base::{DialogBase, HostEnvironment, RunPhase};
use crate::settings::{SettingValue, SettingsStore, DEFAULT_LANGUAGE, LANGUAGE_KEY};
use crate::view_model::{ImportOptionView, ImportViewModel};
use crate::JobRequest;

/// When an option's flag appears on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagPolarity {
    WhenEnabled,
    WhenDisabled,
}

impl FlagPolarity {
    pub fn emits(self, enabled: bool) -> bool {
        match self {
            FlagPolarity::WhenEnabled => enabled,
            FlagPolarity::WhenDisabled => !enabled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOption {
    /// Stable name, also the settings key.
    pub key: &'static str,
    pub label: &'static str,
    pub default_enabled: bool,
    pub flag: &'static str,
    pub polarity: FlagPolarity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportTool {
    pub program: &'static str,
    pub title: &'static str,
    pub settings_group: &'static str,
    pub options: &'static [ImportOption],
    /// Accepted values for `--language=`.
    pub languages: &'static [&'static str],
    /// Extension of compressed input and the flag announcing it.
    pub compressed_input: Option<(&'static str, &'static str)>,
}

impl ImportTool {
    pub fn option(&self, key: &str) -> Option<(usize, &ImportOption)> {
        self.options.iter().enumerate().find(|(_, opt)| opt.key == key)
    }

    pub fn language(&self, name: &str) -> Option<&'static str> {
        self.languages.iter().copied().find(|lang| *lang == name)
    }

    pub fn default_toggles(&self) -> Vec<bool> {
        self.options.iter().map(|opt| opt.default_enabled).collect()
    }

    /// Flags for the given toggle states (parallel to `options`) and language.
    pub fn arguments(&self, toggles: &[bool], language: Option<&str>) -> Vec<String> {
        let mut args: Vec<String> = self
            .options
            .iter()
            .zip(toggles)
            .filter(|(opt, enabled)| opt.polarity.emits(**enabled))
            .map(|(opt, _)| opt.flag.to_string())
            .collect();
        if let Some(language) = language {
            args.push(format!("--language={language}"));
        }
        args
    }
}

pub const MUSICXML_LANGUAGES: &[&str] = &[
    "nederlands",
    "catalan",
    "deutsch",
    "english",
    "espanol",
    "italiano",
    "norsk",
    "portugues",
    "suomi",
    "svenska",
    "vlaams",
];

pub const MUSICXML_OPTIONS: &[ImportOption] = &[
    ImportOption {
        key: "absolute-mode",
        label: "Pitches in absolute mode",
        default_enabled: false,
        flag: "-a",
        polarity: FlagPolarity::WhenEnabled,
    },
    ImportOption {
        key: "articulation-directions",
        label: "Import articulation directions",
        default_enabled: false,
        flag: "--nd",
        polarity: FlagPolarity::WhenDisabled,
    },
    ImportOption {
        key: "rest-positions",
        label: "Import rest positions",
        default_enabled: false,
        flag: "--nrp",
        polarity: FlagPolarity::WhenDisabled,
    },
    ImportOption {
        key: "page-layout",
        label: "Import page layout",
        default_enabled: false,
        flag: "--npl",
        polarity: FlagPolarity::WhenDisabled,
    },
    ImportOption {
        key: "import-beaming",
        label: "Import beaming",
        default_enabled: false,
        flag: "--no-beaming",
        polarity: FlagPolarity::WhenDisabled,
    },
    ImportOption {
        key: "comment-out-midi",
        label: "Comment out midi block",
        default_enabled: false,
        flag: "-m",
        polarity: FlagPolarity::WhenDisabled,
    },
];

pub static MUSICXML2LY: ImportTool = ImportTool {
    program: "musicxml2ly",
    title: "Import Music XML",
    settings_group: "musicxml_import",
    options: MUSICXML_OPTIONS,
    languages: MUSICXML_LANGUAGES,
    compressed_input: Some(("mxl", "-z")),
};

/// State of an importer dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportState {
    tool: &'static ImportTool,
    base: DialogBase,
    host: HostEnvironment,
    command: Vec<String>,
    toggles: Vec<bool>,
    language: Option<&'static str>,
    source: Option<PathBuf>,
    output: String,
}

impl ImportState {
    pub fn new(tool: &'static ImportTool) -> Self {
        Self {
            tool,
            base: DialogBase::default(),
            host: HostEnvironment::default(),
            command: vec![tool.program.to_string()],
            toggles: tool.default_toggles(),
            language: None,
            source: None,
            output: String::new(),
        }
    }

    /// Restore toggles and language from the tool's settings group.
    ///
    /// An unknown stored language falls back to the default.
    pub fn with_settings(
        tool: &'static ImportTool,
        settings: &dyn SettingsStore,
        host: HostEnvironment,
    ) -> Self {
        let mut state = Self::new(tool);
        state.host = host;
        state.toggles = tool
            .options
            .iter()
            .map(|opt| settings.bool_value(tool.settings_group, opt.key, opt.default_enabled))
            .collect();
        let stored = settings.text_value(tool.settings_group, LANGUAGE_KEY, DEFAULT_LANGUAGE);
        state.language = tool.language(&stored);
        state
    }

    pub fn store_settings(&self, settings: &mut dyn SettingsStore) {
        let group = self.tool.settings_group;
        for (opt, enabled) in self.tool.options.iter().zip(&self.toggles) {
            settings.set_value(group, opt.key, SettingValue::Bool(*enabled));
        }
        let language = self.language.unwrap_or(DEFAULT_LANGUAGE);
        settings.set_value(group, LANGUAGE_KEY, SettingValue::Text(language.to_string()));
    }

    pub fn view(&self) -> ImportViewModel {
        ImportViewModel {
            caption: self.tool.title.to_string(),
            phase: self.base.phase(),
            source: self.source.clone(),
            options: self
                .tool
                .options
                .iter()
                .zip(&self.toggles)
                .map(|(opt, enabled)| ImportOptionView {
                    key: opt.key,
                    label: opt.label,
                    enabled: *enabled,
                })
                .collect(),
            language: self.language,
            languages: self.tool.languages,
            messages: self.base.messages().to_string(),
            output: self.output.clone(),
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.base.consume_dirty()
    }

    pub fn tool(&self) -> &'static ImportTool {
        self.tool
    }

    pub fn phase(&self) -> RunPhase {
        self.base.phase()
    }

    pub fn is_running(&self) -> bool {
        self.base.is_running()
    }

    pub fn messages(&self) -> &str {
        self.base.messages()
    }

    /// The importer's stdout, the document to open.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_enabled(&self, key: &str) -> Option<bool> {
        self.tool.option(key).map(|(index, _)| self.toggles[index])
    }

    pub fn language(&self) -> Option<&'static str> {
        self.language
    }

    pub fn arguments(&self) -> Vec<String> {
        self.tool.arguments(&self.toggles, self.language)
    }

    pub(crate) fn base_mut(&mut self) -> &mut DialogBase {
        &mut self.base
    }

    pub(crate) fn set_source(&mut self, path: PathBuf) {
        self.source = Some(path);
        self.base.mark_dirty();
    }

    pub(crate) fn set_command(&mut self, command: Vec<String>) {
        if !command.is_empty() {
            self.command = command;
            self.base.mark_dirty();
        }
    }

    /// Returns false for keys the tool does not know.
    pub(crate) fn set_option(&mut self, key: &str, enabled: bool) -> bool {
        let Some((index, _)) = self.tool.option(key) else {
            return false;
        };
        self.toggles[index] = enabled;
        self.base.mark_dirty();
        true
    }

    /// Returns false for languages the tool does not know; the selection is
    /// then reset to the default.
    pub(crate) fn set_language(&mut self, name: Option<&str>) -> bool {
        let resolved = name
            .filter(|name| *name != DEFAULT_LANGUAGE)
            .map(|name| self.tool.language(name));
        self.base.mark_dirty();
        match resolved {
            None => {
                self.language = None;
                true
            }
            Some(Some(language)) => {
                self.language = Some(language);
                true
            }
            Some(None) => {
                self.language = None;
                false
            }
        }
    }

    pub(crate) fn set_output(&mut self, output: String) {
        self.output = output;
        self.base.mark_dirty();
    }

    pub(crate) fn build_request(&self) -> Result<JobRequest, String> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| format!("No file has been chosen for {}.", self.tool.program))?;

        let mut command = self.command.clone();
        command.extend(self.arguments());
        if let Some((extension, flag)) = self.tool.compressed_input {
            let compressed = source
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
            if compressed {
                command.push(flag.to_string());
            }
        }
        command.push("--output=-".to_string());
        command.push(source.to_string_lossy().into_owned());

        let mut request = JobRequest::new(command);
        request.environment.extend(self.host.interpreter_overrides());
        Ok(request)
    }
}
