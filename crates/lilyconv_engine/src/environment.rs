use lilyconv_core::HostEnvironment;

/// Facts about the running process that change how tools are invoked.
pub fn host_environment() -> HostEnvironment {
    HostEnvironment {
        inside_app_bundle: inside_app_bundle(),
    }
}

#[cfg(target_os = "macos")]
fn inside_app_bundle() -> bool {
    std::env::current_exe()
        .map(|exe| exe.to_string_lossy().contains(".app/Contents/MacOS"))
        .unwrap_or(false)
}

#[cfg(not(target_os = "macos"))]
fn inside_app_bundle() -> bool {
    false
}
