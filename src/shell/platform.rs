//! Platform and process-identity queries.

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in the binaries' `main()`.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Check if running as root/admin.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(windows)]
    {
        std::env::var("ADMIN").is_ok()
    }

    #[cfg(not(any(unix, windows)))]
    {
        false
    }
}

/// Environment variables consulted for the login name, in order.
const USER_ENV_VARS: &[&str] = &["LOGNAME", "USER", "LNAME", "USERNAME"];

/// Name of the user running this process.
///
/// Login environment variables win; the password database is the fallback.
pub fn current_username() -> Option<String> {
    username_from_env(|key| std::env::var(key)).or_else(username_from_passwd)
}

fn username_from_env<F>(env_fn: F) -> Option<String>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    USER_ENV_VARS
        .iter()
        .filter_map(|key| env_fn(key).ok())
        .find(|value| !value.trim().is_empty())
}

#[cfg(unix)]
fn username_from_passwd() -> Option<String> {
    // SAFETY: getpwuid returns a pointer into static storage or null; the
    // name is copied out before any other passwd call can overwrite it.
    unsafe {
        let entry = libc::getpwuid(libc::geteuid());
        if entry.is_null() || (*entry).pw_name.is_null() {
            return None;
        }
        std::ffi::CStr::from_ptr((*entry).pw_name)
            .to_str()
            .ok()
            .map(|s| s.to_string())
    }
}

#[cfg(not(unix))]
fn username_from_passwd() -> Option<String> {
    None
}
