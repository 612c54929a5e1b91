use crate::base::Completion;
use crate::state::UNCHANGED_NOTICE;
use crate::{ConvertMsg, ConvertState, Effect, ImportMsg, ImportState};

/// Pure update function for the convert-ly dialog: applies a message to state
/// and returns any effects.
pub fn update_convert(mut state: ConvertState, msg: ConvertMsg) -> (ConvertState, Vec<Effect>) {
    let effects = match msg {
        ConvertMsg::DocumentLoaded {
            text,
            path,
            encoding,
        } => {
            state.load_document(text, path, encoding);
            Vec::new()
        }
        ConvertMsg::ToolChanged(tool) => {
            state.select_tool(tool);
            request_convert(&mut state)
        }
        ConvertMsg::FromVersionEdited(version) => {
            state.set_from_version(version);
            Vec::new()
        }
        ConvertMsg::ToVersionEdited(version) => {
            state.set_to_version(version);
            Vec::new()
        }
        ConvertMsg::RunRequested => request_convert(&mut state),
        ConvertMsg::CopyMessagesToggled(enabled) => {
            state.set_copy_messages(enabled);
            Vec::new()
        }
        ConvertMsg::JobDone { job_id, report } => {
            match state.base_mut().complete(job_id, &report) {
                Completion::Stale | Completion::StartFailed => {}
                Completion::Finished => {
                    let unchanged =
                        report.stdout.is_empty() || report.stdout == state.document_text();
                    state.set_converted(report.stdout);
                    if unchanged {
                        state.base_mut().append_message(UNCHANGED_NOTICE);
                    }
                }
            }
            Vec::new()
        }
        ConvertMsg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Pure update function for an importer dialog.
pub fn update_import(mut state: ImportState, msg: ImportMsg) -> (ImportState, Vec<Effect>) {
    let effects = match msg {
        ImportMsg::SourceSelected(path) => {
            state.set_source(path);
            Vec::new()
        }
        ImportMsg::ToolChanged(command) => {
            state.set_command(command);
            Vec::new()
        }
        ImportMsg::OptionToggled { key, enabled } => {
            if !state.set_option(&key, enabled) {
                state
                    .base_mut()
                    .set_messages(format!("Unknown option '{key}'."));
            }
            Vec::new()
        }
        ImportMsg::LanguageSelected(language) => {
            if !state.set_language(language.as_deref()) {
                let name = language.unwrap_or_default();
                state.base_mut().set_messages(format!(
                    "Unknown pitch language '{name}', using the default."
                ));
            }
            Vec::new()
        }
        ImportMsg::RunRequested => match state.build_request() {
            Ok(request) => {
                let job_id = state.base_mut().begin_job();
                vec![Effect::StartJob { job_id, request }]
            }
            Err(message) => {
                state.base_mut().set_messages(message);
                Vec::new()
            }
        },
        ImportMsg::JobDone { job_id, report } => {
            match state.base_mut().complete(job_id, &report) {
                Completion::Stale | Completion::StartFailed => {}
                Completion::Finished => {
                    let empty = report.stdout.is_empty();
                    state.set_output(report.stdout);
                    if empty {
                        let notice = format!("{} produced no output.", state.tool().program);
                        state.base_mut().append_message(&notice);
                    }
                }
            }
            Vec::new()
        }
        ImportMsg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn request_convert(state: &mut ConvertState) -> Vec<Effect> {
    match state.build_request() {
        Ok(request) => {
            let job_id = state.base_mut().begin_job();
            vec![Effect::StartJob { job_id, request }]
        }
        Err(message) => {
            state.base_mut().set_messages(message);
            Vec::new()
        }
    }
}
