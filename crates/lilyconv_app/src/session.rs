//! Message loops that drive a dialog model until its job has finished.

use lilyconv_core::{
    update_convert, update_import, ConvertMsg, ConvertState, ImportMsg, ImportState,
};
use lilyconv_logging::{lily_debug, lily_error};

use crate::effects::EffectRunner;

pub(crate) fn drive_convert(
    runner: &EffectRunner,
    state: ConvertState,
    msg: ConvertMsg,
) -> ConvertState {
    let (mut state, effects) = update_convert(state, msg);
    runner.execute(effects);
    while state.is_running() {
        let Some((job_id, report)) = runner.next_report() else {
            lily_error!("Engine stopped while convert-ly was running");
            break;
        };
        let (next, effects) = update_convert(state, ConvertMsg::JobDone { job_id, report });
        state = next;
        runner.execute(effects);
    }
    if state.consume_dirty() {
        lily_debug!("Conversion dialog now {:?}", state.phase());
    }
    state
}

pub(crate) fn drive_import(
    runner: &EffectRunner,
    state: ImportState,
    msg: ImportMsg,
) -> ImportState {
    let (mut state, effects) = update_import(state, msg);
    runner.execute(effects);
    while state.is_running() {
        let Some((job_id, report)) = runner.next_report() else {
            lily_error!("Engine stopped while {} was running", state.tool().program);
            break;
        };
        let (next, effects) = update_import(state, ImportMsg::JobDone { job_id, report });
        state = next;
        runner.execute(effects);
    }
    if state.consume_dirty() {
        lily_debug!("Import dialog now {:?}", state.phase());
    }
    state
}
