use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use lilyconv_core::{
    update_convert, ConvertMsg, ConvertState, ResultTab, SettingValue, SettingsStore, ToolInfo,
    CONVERT_PROGRAM, LILYPOND_GROUP, NO_TRANSLATION_KEY,
};
use lilyconv_engine::{
    decode_document, encode_document, host_environment, write_file, write_text_file,
};
use lilyconv_logging::{lily_info, lily_warn};

use super::{save_settings, tool_command, RunStatus};
use crate::effects::EffectRunner;
use crate::persistence::SettingsFile;
use crate::session::drive_convert;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum TabArg {
    Messages,
    HtmlDiff,
    UniDiff,
}

impl From<TabArg> for ResultTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Messages => ResultTab::Messages,
            TabArg::HtmlDiff => ResultTab::HtmlDiff,
            TabArg::UniDiff => ResultTab::UnifiedDiff,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ConvertArgs {
    #[arg(help = "LilyPond document to convert")]
    file: PathBuf,
    #[arg(long, value_name = "VERSION", help = "Version to convert from (default: the document's \\version)")]
    from: Option<String>,
    #[arg(long, value_name = "VERSION", help = "Version to convert to (default: the version convert-ly reports)")]
    to: Option<String>,
    #[arg(long, value_name = "COMMAND", help = "convert-ly command, e.g. \"python3 /opt/lilypond/bin/convert-ly\"")]
    convert_ly: Option<String>,
    #[arg(long, value_enum, default_value = "uni-diff", help = "Result view to print on stdout")]
    show: TabArg,
    #[arg(long, value_enum, value_name = "TAB", help = "Save a result view next to the document (repeatable)")]
    save: Vec<TabArg>,
    #[arg(long, value_name = "DIR", help = "Directory for --save instead of the document's directory")]
    save_to: Option<PathBuf>,
    #[arg(long, conflicts_with = "output", help = "Replace the document with the converted text, keeping its encoding")]
    write: bool,
    #[arg(long, value_name = "PATH", help = "Write the converted text to this file")]
    output: Option<PathBuf>,
    #[arg(long, conflicts_with = "no_copy_messages", help = "Append the messages as a comment to the converted text")]
    copy_messages: bool,
    #[arg(long, help = "Do not append the messages to the converted text")]
    no_copy_messages: bool,
    #[arg(long, help = "Run convert-ly with untranslated (English) messages")]
    no_translation: bool,
}

impl ConvertArgs {
    fn copy_messages_override(&self) -> Option<bool> {
        match (self.copy_messages, self.no_copy_messages) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

pub(crate) fn run(
    args: ConvertArgs,
    settings: &mut SettingsFile,
    runner: &EffectRunner,
) -> Result<RunStatus> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
    let decoded = decode_document(&bytes)
        .with_context(|| format!("Failed to decode {}", args.file.display()))?;
    lily_info!(
        "Loaded {} ({} bytes, {})",
        args.file.display(),
        bytes.len(),
        decoded.encoding_label
    );

    // A one-off flag must not end up in the stored preferences.
    let mut effective = settings.settings().clone();
    if args.no_translation {
        effective.set_value(LILYPOND_GROUP, NO_TRANSLATION_KEY, SettingValue::Bool(true));
    }

    let mut state = ConvertState::with_settings(&effective, host_environment());
    state = apply(
        state,
        ConvertMsg::DocumentLoaded {
            text: decoded.text,
            path: Some(args.file.clone()),
            encoding: Some(decoded.encoding_label),
        },
    );
    if let Some(enabled) = args.copy_messages_override() {
        state = apply(state, ConvertMsg::CopyMessagesToggled(enabled));
    }
    if let Some(from) = args.from.clone() {
        state = apply(state, ConvertMsg::FromVersionEdited(from));
    }

    let command = tool_command(args.convert_ly.as_deref(), CONVERT_PROGRAM);
    let version = match args.to.clone() {
        Some(to) => Some(to),
        None => runner.probe_version(&command),
    };
    let tool = ToolInfo::new(command, version);
    let state = drive_convert(runner, state, ConvertMsg::ToolChanged(tool));
    if state.is_running() {
        bail!("The job engine stopped before convert-ly finished");
    }

    let view = state.view();
    lily_info!("{}: {:?}", view.caption, view.phase);
    print_results(&state, args.show)?;

    for tab in &args.save {
        save_tab(&state, (*tab).into(), args.save_to.as_deref())?;
    }

    if args.write || args.output.is_some() {
        match state.accepted_text() {
            Some(text) => {
                let target = args.output.clone().unwrap_or_else(|| args.file.clone());
                let bytes = encode_document(&text, state.document_encoding());
                write_file(&target, &bytes)
                    .with_context(|| format!("Failed to write {}", target.display()))?;
                eprintln!(
                    "Wrote converted document to {} ({})",
                    target.display(),
                    state.document_encoding()
                );
            }
            None => eprintln!("Nothing to write: there is no converted text."),
        }
    }

    state.store_settings(settings.settings_mut());
    save_settings(settings);

    Ok(RunStatus::from_phase(state.phase()))
}

fn apply(state: ConvertState, msg: ConvertMsg) -> ConvertState {
    let (state, effects) = update_convert(state, msg);
    if !effects.is_empty() {
        lily_warn!("Ignoring {} unexpected effects", effects.len());
    }
    state
}

fn print_results(state: &ConvertState, show: TabArg) -> Result<()> {
    let shown = state.file_info(show.into());
    let mut stdout = io::stdout().lock();
    if !shown.text.is_empty() {
        stdout.write_all(shown.text.as_bytes())?;
        if !shown.text.ends_with('\n') {
            writeln!(stdout)?;
        }
    }
    if show != TabArg::Messages && !state.messages().is_empty() {
        eprintln!("{}", state.messages().trim_end());
    }
    Ok(())
}

fn save_tab(state: &ConvertState, tab: ResultTab, save_to: Option<&Path>) -> Result<()> {
    let info = state.file_info(tab);
    let derived = state.save_path(tab);
    let target = match (save_to, derived.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => derived.clone(),
    };
    write_text_file(&target, &info.text)
        .with_context(|| format!("Failed to save {} to {}", tab.title(), target.display()))?;
    eprintln!("Saved {} to {}", tab.title(), target.display());
    Ok(())
}
