use std::path::{Path, PathBuf};

use lilyconv_core::{
    update_convert, ConvertMsg, ConvertState, Effect, HostEnvironment, JobId, JobReport,
    JobRequest, MemorySettings, ResultTab, RunPhase, SettingValue, SettingsStore, ToolInfo,
    CONVERT_GROUP, COPY_MESSAGES_KEY, LILYPOND_GROUP, NO_TRANSLATION_KEY, UNCHANGED_NOTICE,
    VERSION_FROM_DOCUMENT,
};
use pretty_assertions::assert_eq;

const DOCUMENT: &str = "\\version \"2.18.2\"\n\n{ \\times 2/3 { c'8 d' e' } }\n";
const CONVERTED: &str = "\\version \"2.24.0\"\n\n{ \\tuplet 3/2 { c'8 d' e' } }\n";

fn tool(version: Option<&str>) -> ToolInfo {
    ToolInfo::new(
        vec!["/opt/lilypond/bin/convert-ly".to_string()],
        version.map(str::to_string),
    )
}

fn load(state: ConvertState, text: &str) -> ConvertState {
    let (state, effects) = update_convert(
        state,
        ConvertMsg::DocumentLoaded {
            text: text.to_string(),
            path: Some(PathBuf::from("/x/song.ly")),
            encoding: None,
        },
    );
    assert!(effects.is_empty());
    state
}

fn start_job(effects: &[Effect]) -> (JobId, JobRequest) {
    match effects {
        [Effect::StartJob { job_id, request }] => (*job_id, request.clone()),
        other => panic!("expected a single StartJob effect, got {other:?}"),
    }
}

fn started(text: &str) -> (ConvertState, JobId, JobRequest) {
    let state = load(ConvertState::new(), text);
    let (state, effects) = update_convert(state, ConvertMsg::ToolChanged(tool(Some("2.24.0"))));
    let (job_id, request) = start_job(&effects);
    (state, job_id, request)
}

fn finished(stdout: &str, stderr: &str) -> JobReport {
    JobReport {
        program: "/opt/lilypond/bin/convert-ly".to_string(),
        success: true,
        exit_code: Some(0),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        ..JobReport::default()
    }
}

#[test]
fn tool_change_runs_convert_ly_on_the_document() {
    let (state, _job_id, request) = started(DOCUMENT);

    assert_eq!(
        request.command,
        vec![
            "/opt/lilypond/bin/convert-ly",
            "-f",
            "2.18.2",
            "-t",
            "2.24.0",
            "-"
        ]
    );
    assert_eq!(request.input.as_deref(), Some(DOCUMENT));
    assert_eq!(request.encoding, "UTF-8");
    assert_eq!(request.env_override("LC_MESSAGES"), None);

    let view = state.view();
    assert_eq!(view.caption, "Convert-ly from LilyPond 2.24.0");
    assert_eq!(view.version_reason.as_deref(), Some(VERSION_FROM_DOCUMENT));
    assert!(matches!(view.phase, RunPhase::Running { .. }));
    assert!(!view.accept_enabled);
}

#[test]
fn environment_follows_settings_and_host() {
    let mut settings = MemorySettings::new();
    settings.set_value(LILYPOND_GROUP, NO_TRANSLATION_KEY, SettingValue::Bool(true));
    let host = HostEnvironment {
        inside_app_bundle: true,
    };

    let state = load(ConvertState::with_settings(&settings, host), DOCUMENT);
    let (_state, effects) = update_convert(state, ConvertMsg::ToolChanged(tool(Some("2.24.0"))));
    let (_, request) = start_job(&effects);

    assert_eq!(request.env_override("LC_MESSAGES"), Some(Some("C")));
    assert_eq!(request.env_override("PYTHONPATH"), Some(None));
    assert_eq!(request.env_override("PYTHONHOME"), Some(None));
}

#[test]
fn missing_versions_block_the_run() {
    let state = load(ConvertState::new(), "{ c d e }");
    let (state, effects) = update_convert(state, ConvertMsg::ToolChanged(tool(None)));
    assert!(effects.is_empty());
    assert_eq!(state.messages(), "Both 'from' and 'to' versions need to be set.");
    assert_eq!(state.phase(), RunPhase::Idle);

    let (state, _) = update_convert(state, ConvertMsg::ToVersionEdited("2.24.0".into()));
    let (state, effects) = update_convert(state, ConvertMsg::RunRequested);
    assert!(effects.is_empty());
    assert_eq!(state.messages(), "The 'from' version needs to be set.");

    let (state, _) = update_convert(state, ConvertMsg::FromVersionEdited("2.18.2".into()));
    let (_state, effects) = update_convert(state, ConvertMsg::RunRequested);
    let (_, request) = start_job(&effects);
    assert_eq!(&request.command[1..5], ["-f", "2.18.2", "-t", "2.24.0"]);
}

#[test]
fn run_without_tool_is_blocked() {
    let state = load(ConvertState::new(), DOCUMENT);
    let (state, _) = update_convert(state, ConvertMsg::ToVersionEdited("2.24.0".into()));
    let (state, effects) = update_convert(state, ConvertMsg::RunRequested);
    assert!(effects.is_empty());
    assert!(state.messages().contains("convert-ly"));
}

#[test]
fn start_failure_reports_program_and_leaves_diffs_empty() {
    let (state, job_id, _) = started(DOCUMENT);
    let report = JobReport {
        program: "/opt/lilypond/bin/convert-ly".to_string(),
        failed_to_start: true,
        error: Some("No such file or directory (os error 2)".to_string()),
        ..JobReport::default()
    };

    let (state, effects) = update_convert(state, ConvertMsg::JobDone { job_id, report });
    assert!(effects.is_empty());

    let view = state.view();
    assert_eq!(view.phase, RunPhase::StartFailed);
    assert_eq!(
        view.messages,
        "Could not start /opt/lilypond/bin/convert-ly:\n\nNo such file or directory (os error 2)\n"
    );
    assert!(view.html_diff.is_empty());
    assert!(view.unified_diff_html.is_empty());
    assert!(view.unified_diff_text.is_empty());
    assert!(!view.accept_enabled);
    assert!(!view.messages.contains(UNCHANGED_NOTICE));
}

#[test]
fn successful_conversion_fills_every_view() {
    let (state, job_id, _) = started(DOCUMENT);
    let stderr = "convert-ly (GNU LilyPond) 2.24.0\nApplying conversion: 2.19.2\n";

    let (state, _) = update_convert(
        state,
        ConvertMsg::JobDone {
            job_id,
            report: finished(CONVERTED, stderr),
        },
    );

    let view = state.view();
    assert_eq!(view.phase, RunPhase::Succeeded);
    assert_eq!(view.messages, stderr);
    assert!(view.accept_enabled);
    assert!(view.html_diff.contains("<th colspan=\"2\""));
    assert!(view.html_diff.contains(">Current Document</th>"));
    assert!(view.html_diff.contains(">Converted Document</th>"));
    assert!(view.unified_diff_text.starts_with("--- current\n+++ converted\n@@ "));
    assert!(view
        .unified_diff_text
        .contains("-{ \\times 2/3 { c'8 d' e' } }"));
    assert!(view
        .unified_diff_text
        .contains("+{ \\tuplet 3/2 { c'8 d' e' } }"));
    assert!(view.unified_diff_html.contains("color: red"));
    assert_eq!(state.converted_text(), CONVERTED);
}

#[test]
fn identical_output_appends_unchanged_notice() {
    let (state, job_id, _) = started(DOCUMENT);
    let (state, _) = update_convert(
        state,
        ConvertMsg::JobDone {
            job_id,
            report: finished(DOCUMENT, "Applying conversion: \n"),
        },
    );

    assert_eq!(
        state.messages(),
        format!("Applying conversion: \n\n{UNCHANGED_NOTICE}")
    );
    assert!(state.view().unified_diff_text.is_empty());
    // Identical output is still a valid result to accept.
    assert!(state.view().accept_enabled);
}

#[test]
fn empty_output_appends_notice_and_disables_accept() {
    let (state, job_id, _) = started(DOCUMENT);
    let (state, _) = update_convert(
        state,
        ConvertMsg::JobDone {
            job_id,
            report: finished("", ""),
        },
    );

    assert_eq!(state.messages(), UNCHANGED_NOTICE);
    assert_eq!(state.accepted_text(), None);
    assert!(state.view().html_diff.is_empty());
}

#[test]
fn nonzero_exit_still_shows_messages() {
    let (state, job_id, _) = started(DOCUMENT);
    let report = JobReport {
        success: false,
        exit_code: Some(1),
        ..finished(CONVERTED, "warning: could not convert\n")
    };
    let (state, _) = update_convert(state, ConvertMsg::JobDone { job_id, report });

    assert_eq!(state.phase(), RunPhase::Succeeded);
    assert_eq!(state.messages(), "warning: could not convert\n");
    assert!(state.view().accept_enabled);
}

#[test]
fn run_again_ignores_the_superseded_job() {
    let (state, first_job, _) = started(DOCUMENT);
    let (state, effects) = update_convert(state, ConvertMsg::RunRequested);
    let (second_job, _) = start_job(&effects);
    assert_ne!(first_job, second_job);

    let (state, _) = update_convert(
        state,
        ConvertMsg::JobDone {
            job_id: first_job,
            report: finished("stale output", "stale"),
        },
    );
    assert!(state.is_running());
    assert_eq!(state.converted_text(), "");

    let (state, _) = update_convert(
        state,
        ConvertMsg::JobDone {
            job_id: second_job,
            report: finished(CONVERTED, ""),
        },
    );
    assert_eq!(state.converted_text(), CONVERTED);
}

#[test]
fn accepted_text_embeds_messages_when_enabled() {
    let (state, job_id, _) = started(DOCUMENT);
    let (state, _) = update_convert(
        state,
        ConvertMsg::JobDone {
            job_id,
            report: finished(CONVERTED, "Applying conversion:\n2.19.2"),
        },
    );

    assert_eq!(
        state.accepted_text().as_deref(),
        Some(format!("{CONVERTED}\n\n%{{\nApplying conversion: 2.19.2\n%}}\n").as_str())
    );

    let (state, _) = update_convert(state, ConvertMsg::CopyMessagesToggled(false));
    assert_eq!(state.accepted_text().as_deref(), Some(CONVERTED));
}

#[test]
fn unified_diff_tab_saves_next_to_document() {
    let (state, job_id, _) = started(DOCUMENT);
    let (state, _) = update_convert(
        state,
        ConvertMsg::JobDone {
            job_id,
            report: finished(CONVERTED, ""),
        },
    );

    let info = state.file_info(ResultTab::UnifiedDiff);
    assert_eq!(
        info.target_path(Some(Path::new("/x/song.ly"))),
        PathBuf::from("/x/song[uni-diff].diff")
    );
    assert_eq!(
        state.save_path(ResultTab::UnifiedDiff),
        PathBuf::from("/x/song[uni-diff].diff")
    );
    assert_eq!(info.text, state.view().unified_diff_text);
    assert_eq!(info.bytes(), state.view().unified_diff_text.as_bytes());

    assert_eq!(state.file_info(ResultTab::HtmlDiff).text, state.view().html_diff);
    assert_eq!(state.file_info(ResultTab::Messages).text, state.messages());
}

#[test]
fn copy_messages_setting_round_trips() {
    let mut settings = MemorySettings::new();
    settings.set_value(CONVERT_GROUP, COPY_MESSAGES_KEY, SettingValue::Bool(false));

    let state = ConvertState::with_settings(&settings, HostEnvironment::default());
    assert!(!state.view().copy_messages);

    let (state, _) = update_convert(state, ConvertMsg::CopyMessagesToggled(true));
    state.store_settings(&mut settings);
    assert!(settings.bool_value(CONVERT_GROUP, COPY_MESSAGES_KEY, false));
}

#[test]
fn editing_from_version_clears_the_reason() {
    let state = load(ConvertState::new(), DOCUMENT);
    assert_eq!(
        state.view().version_reason.as_deref(),
        Some(VERSION_FROM_DOCUMENT)
    );
    let (mut state, _) = update_convert(state, ConvertMsg::FromVersionEdited("2.16.0".into()));
    assert_eq!(state.view().from_version, "2.16.0");
    assert_eq!(state.view().version_reason, None);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn loading_a_new_document_clears_results() {
    let (state, job_id, _) = started(DOCUMENT);
    let (state, _) = update_convert(
        state,
        ConvertMsg::JobDone {
            job_id,
            report: finished(CONVERTED, ""),
        },
    );
    let state = load(state, "{ c }");
    let view = state.view();
    assert!(!view.accept_enabled);
    assert!(view.html_diff.is_empty());
    assert!(view.unified_diff_text.is_empty());
    assert_eq!(state.result().original, "{ c }");
}
