use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::builder::PossibleValuesParser;
use clap::Args;
use lilyconv_core::{
    update_import, ImportMsg, ImportState, DEFAULT_LANGUAGE, MUSICXML2LY, MUSICXML_LANGUAGES,
    MUSICXML_OPTIONS,
};
use lilyconv_engine::{host_environment, write_text_file};
use lilyconv_logging::lily_info;

use super::{save_settings, tool_command, RunStatus};
use crate::effects::EffectRunner;
use crate::persistence::SettingsFile;
use crate::session::drive_import;

fn option_keys() -> PossibleValuesParser {
    PossibleValuesParser::new(MUSICXML_OPTIONS.iter().map(|opt| opt.key))
}

fn language_names() -> PossibleValuesParser {
    PossibleValuesParser::new(
        std::iter::once(DEFAULT_LANGUAGE).chain(MUSICXML_LANGUAGES.iter().copied()),
    )
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    #[arg(help = "MusicXML file (.xml, .musicxml or compressed .mxl)")]
    file: PathBuf,
    #[arg(long, value_name = "COMMAND", help = "musicxml2ly command, e.g. \"python3 /opt/lilypond/bin/musicxml2ly\"")]
    musicxml2ly: Option<String>,
    #[arg(long, value_name = "OPTION", value_parser = option_keys(), help = "Turn an import option on (repeatable)")]
    enable: Vec<String>,
    #[arg(long, value_name = "OPTION", value_parser = option_keys(), help = "Turn an import option off (repeatable)")]
    disable: Vec<String>,
    #[arg(long, value_name = "NAME", value_parser = language_names(), help = "Pitch name language for the output")]
    language: Option<String>,
    #[arg(long, value_name = "PATH", help = "Write the LilyPond document here instead of stdout")]
    output: Option<PathBuf>,
}

pub(crate) fn run(
    args: ImportArgs,
    settings: &mut SettingsFile,
    runner: &EffectRunner,
) -> Result<RunStatus> {
    let mut state =
        ImportState::with_settings(&MUSICXML2LY, settings.settings(), host_environment());

    let mut msgs = vec![ImportMsg::SourceSelected(args.file.clone())];
    if let Some(command) = args.musicxml2ly.as_deref() {
        msgs.push(ImportMsg::ToolChanged(tool_command(Some(command), MUSICXML2LY.program)));
    }
    msgs.extend(args.enable.iter().map(|key| ImportMsg::OptionToggled {
        key: key.clone(),
        enabled: true,
    }));
    msgs.extend(args.disable.iter().map(|key| ImportMsg::OptionToggled {
        key: key.clone(),
        enabled: false,
    }));
    if let Some(language) = args.language.clone() {
        msgs.push(ImportMsg::LanguageSelected(Some(language)));
    }
    for msg in msgs {
        state = update_import(state, msg).0;
    }
    if !state.messages().is_empty() {
        bail!("{}", state.messages());
    }
    lily_info!("{} arguments: {:?}", MUSICXML2LY.program, state.arguments());

    let state = drive_import(runner, state, ImportMsg::RunRequested);
    if state.is_running() {
        bail!("The job engine stopped before {} finished", MUSICXML2LY.program);
    }

    if !state.output().is_empty() {
        match &args.output {
            Some(target) => {
                write_text_file(target, state.output())
                    .with_context(|| format!("Failed to write {}", target.display()))?;
                eprintln!("Wrote imported document to {}", target.display());
            }
            None => io::stdout().lock().write_all(state.output().as_bytes())?,
        }
    }
    if !state.messages().is_empty() {
        eprintln!("{}", state.messages().trim_end());
    }

    state.store_settings(settings.settings_mut());
    save_settings(settings);

    Ok(RunStatus::from_phase(state.phase()))
}
