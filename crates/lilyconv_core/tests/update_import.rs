use std::path::PathBuf;

use lilyconv_core::{
    update_import, Effect, FlagPolarity, HostEnvironment, ImportMsg, ImportState, JobReport,
    JobRequest, MemorySettings, RunPhase, SettingValue, SettingsStore, LANGUAGE_KEY, MUSICXML2LY,
    MUSICXML_LANGUAGES, MUSICXML_OPTIONS,
};
use pretty_assertions::assert_eq;

const NEGATING_FLAGS: [(&str, &str); 5] = [
    ("articulation-directions", "--nd"),
    ("rest-positions", "--nrp"),
    ("page-layout", "--npl"),
    ("import-beaming", "--no-beaming"),
    ("comment-out-midi", "-m"),
];

fn init_logging() {
    lilyconv_logging::initialize_for_tests();
}

fn with_source(path: &str) -> ImportState {
    let (state, effects) = update_import(
        ImportState::new(&MUSICXML2LY),
        ImportMsg::SourceSelected(PathBuf::from(path)),
    );
    assert!(effects.is_empty());
    state
}

fn run(state: ImportState) -> (ImportState, u64, JobRequest) {
    let (state, effects) = update_import(state, ImportMsg::RunRequested);
    match effects.as_slice() {
        [Effect::StartJob { job_id, request }] => {
            let (job_id, request) = (*job_id, request.clone());
            (state, job_id, request)
        }
        other => panic!("expected a single StartJob effect, got {other:?}"),
    }
}

#[test]
fn flag_table_matches_every_toggle_combination() {
    init_logging();
    let count = MUSICXML_OPTIONS.len();
    assert_eq!(count, 6);

    for mask in 0u32..(1 << count) {
        let toggles: Vec<bool> = (0..count).map(|bit| mask & (1 << bit) != 0).collect();
        let args = MUSICXML2LY.arguments(&toggles, None);

        assert!(
            !args.iter().any(|arg| arg.starts_with("--language")),
            "mask {mask:06b}: {args:?}"
        );
        for (opt, enabled) in MUSICXML_OPTIONS.iter().zip(&toggles) {
            let present = args.iter().any(|arg| arg == opt.flag);
            let expected = match opt.polarity {
                FlagPolarity::WhenEnabled => *enabled,
                FlagPolarity::WhenDisabled => !*enabled,
            };
            assert_eq!(present, expected, "mask {mask:06b}, option {}", opt.key);
        }

        let absolute = toggles[MUSICXML2LY.option("absolute-mode").unwrap().0];
        assert_eq!(args.iter().any(|arg| arg == "-a"), absolute);
        for (key, flag) in NEGATING_FLAGS {
            let enabled = toggles[MUSICXML2LY.option(key).unwrap().0];
            assert_eq!(
                args.iter().any(|arg| arg == flag),
                !enabled,
                "mask {mask:06b}, flag {flag}"
            );
        }
    }
}

#[test]
fn all_enabled_without_language_emits_only_absolute() {
    let args = MUSICXML2LY.arguments(&[true; 6], None);
    assert_eq!(args, vec!["-a"]);
}

#[test]
fn defaults_emit_every_negating_flag() {
    let state = ImportState::new(&MUSICXML2LY);
    assert_eq!(
        state.arguments(),
        vec!["--nd", "--nrp", "--npl", "--no-beaming", "-m"]
    );
}

#[test]
fn run_builds_importer_command() {
    let state = with_source("/scores/bach.xml");
    let (state, _) = update_import(
        state,
        ImportMsg::OptionToggled {
            key: "absolute-mode".into(),
            enabled: true,
        },
    );
    let (state, _) = update_import(state, ImportMsg::LanguageSelected(Some("deutsch".into())));

    let (state, _job_id, request) = run(state);
    assert_eq!(
        request.command,
        vec![
            "musicxml2ly",
            "-a",
            "--nd",
            "--nrp",
            "--npl",
            "--no-beaming",
            "-m",
            "--language=deutsch",
            "--output=-",
            "/scores/bach.xml",
        ]
    );
    assert_eq!(request.input, None);
    assert!(matches!(state.phase(), RunPhase::Running { .. }));
}

#[test]
fn compressed_input_adds_flag() {
    let (_, _, request) = run(with_source("/scores/bach.MXL"));
    let tail = &request.command[request.command.len() - 3..];
    assert_eq!(tail, ["-z", "--output=-", "/scores/bach.MXL"]);
}

#[test]
fn custom_tool_command_is_used() {
    let state = with_source("a.xml");
    let (state, _) = update_import(
        state,
        ImportMsg::ToolChanged(vec!["python3".into(), "/usr/bin/musicxml2ly".into()]),
    );
    let (_, _, request) = run(state);
    assert_eq!(&request.command[..2], ["python3", "/usr/bin/musicxml2ly"]);
}

#[test]
fn run_without_source_is_blocked() {
    let (state, effects) = update_import(ImportState::new(&MUSICXML2LY), ImportMsg::RunRequested);
    assert!(effects.is_empty());
    assert!(state.messages().contains("musicxml2ly"));
    assert_eq!(state.phase(), RunPhase::Idle);
}

#[test]
fn output_and_messages_come_from_the_job() {
    let (state, job_id, _) = run(with_source("a.xml"));
    let report = JobReport {
        program: "musicxml2ly".into(),
        success: true,
        exit_code: Some(0),
        stdout: "\\version \"2.24.0\"\n{ c'4 }\n".into(),
        stderr: "musicxml2ly: Reading MusicXML from a.xml ...\n".into(),
        ..JobReport::default()
    };
    let (state, _) = update_import(state, ImportMsg::JobDone { job_id, report });

    assert_eq!(state.phase(), RunPhase::Succeeded);
    assert_eq!(state.output(), "\\version \"2.24.0\"\n{ c'4 }\n");
    assert_eq!(
        state.messages(),
        "musicxml2ly: Reading MusicXML from a.xml ...\n"
    );
}

#[test]
fn empty_output_is_noted() {
    let (state, job_id, _) = run(with_source("a.xml"));
    let report = JobReport {
        program: "musicxml2ly".into(),
        ..JobReport::default()
    };
    let (state, _) = update_import(state, ImportMsg::JobDone { job_id, report });
    assert_eq!(state.messages(), "musicxml2ly produced no output.");
}

#[test]
fn start_failure_names_the_importer() {
    let (state, job_id, _) = run(with_source("a.xml"));
    let report = JobReport {
        program: "musicxml2ly".into(),
        failed_to_start: true,
        error: Some("Permission denied (os error 13)".into()),
        ..JobReport::default()
    };
    let (state, _) = update_import(state, ImportMsg::JobDone { job_id, report });
    assert_eq!(state.phase(), RunPhase::StartFailed);
    assert_eq!(
        state.messages(),
        "Could not start musicxml2ly:\n\nPermission denied (os error 13)\n"
    );
    assert_eq!(state.output(), "");
}

#[test]
fn settings_round_trip_language_and_toggles() {
    init_logging();
    let state = with_source("a.xml");
    let (state, _) = update_import(
        state,
        ImportMsg::OptionToggled {
            key: "page-layout".into(),
            enabled: true,
        },
    );
    let (state, _) = update_import(state, ImportMsg::LanguageSelected(Some("suomi".into())));

    let mut settings = MemorySettings::new();
    state.store_settings(&mut settings);
    assert_eq!(
        settings.value("musicxml_import", LANGUAGE_KEY),
        Some(SettingValue::Text("suomi".into()))
    );

    let restored = ImportState::with_settings(&MUSICXML2LY, &settings, HostEnvironment::default());
    assert_eq!(restored.is_enabled("page-layout"), Some(true));
    assert_eq!(restored.is_enabled("rest-positions"), Some(false));
    assert_eq!(restored.language(), Some("suomi"));
}

#[test]
fn unknown_stored_language_falls_back_to_default() {
    let mut settings = MemorySettings::new();
    settings.set_value(
        "musicxml_import",
        LANGUAGE_KEY,
        SettingValue::Text("klingon".into()),
    );
    let state = ImportState::with_settings(&MUSICXML2LY, &settings, HostEnvironment::default());
    assert_eq!(state.language(), None);
    assert!(!state.arguments().iter().any(|a| a.starts_with("--language")));

    let mut stored = MemorySettings::new();
    state.store_settings(&mut stored);
    assert_eq!(
        stored.text_value("musicxml_import", LANGUAGE_KEY, ""),
        "default"
    );
}

#[test]
fn unknown_language_selection_resets_to_default() {
    let state = with_source("a.xml");
    let (state, _) = update_import(state, ImportMsg::LanguageSelected(Some("english".into())));
    assert_eq!(state.language(), Some("english"));

    let (state, _) = update_import(state, ImportMsg::LanguageSelected(Some("latin".into())));
    assert_eq!(state.language(), None);
    assert!(state.messages().contains("latin"));

    let (state, _) = update_import(state, ImportMsg::LanguageSelected(Some("default".into())));
    assert_eq!(state.language(), None);
}

#[test]
fn unknown_option_is_reported() {
    let (state, _) = update_import(
        ImportState::new(&MUSICXML2LY),
        ImportMsg::OptionToggled {
            key: "lyrics".into(),
            enabled: true,
        },
    );
    assert!(state.messages().contains("lyrics"));
}

#[test]
fn language_list_is_offered_in_view() {
    let view = ImportState::new(&MUSICXML2LY).view();
    assert_eq!(view.languages, MUSICXML_LANGUAGES);
    assert_eq!(view.languages.len(), 11);
    assert_eq!(view.options.len(), 6);
    assert_eq!(view.caption, "Import Music XML");
}
