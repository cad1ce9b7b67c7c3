//! Output verbosity.

/// How much a run prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Status plus the stdout of install commands.
    Verbose,
    /// Status messages and spinners.
    #[default]
    Normal,
    /// Status messages without spinners.
    Quiet,
    /// Errors only.
    Silent,
}

impl OutputMode {
    /// Pick a mode from `--verbose` and the number of `--quiet` flags.
    ///
    /// Quiet wins over verbose; `-qq` silences everything but errors.
    pub fn from_flags(verbose: bool, quiet: u8) -> Self {
        match quiet {
            0 if verbose => Self::Verbose,
            0 => Self::Normal,
            1 => Self::Quiet,
            _ => Self::Silent,
        }
    }

    pub fn shows_command_output(&self) -> bool {
        *self == Self::Verbose
    }

    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    pub fn shows_status(&self) -> bool {
        *self != Self::Silent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_select_mode() {
        assert_eq!(OutputMode::from_flags(false, 0), OutputMode::Normal);
        assert_eq!(OutputMode::from_flags(true, 0), OutputMode::Verbose);
        assert_eq!(OutputMode::from_flags(false, 1), OutputMode::Quiet);
        assert_eq!(OutputMode::from_flags(false, 2), OutputMode::Silent);
        assert_eq!(OutputMode::from_flags(false, 5), OutputMode::Silent);
    }

    #[test]
    fn quiet_beats_verbose() {
        assert_eq!(OutputMode::from_flags(true, 1), OutputMode::Quiet);
    }

    #[test]
    fn only_verbose_shows_command_output() {
        assert!(OutputMode::Verbose.shows_command_output());
        assert!(!OutputMode::Normal.shows_command_output());
        assert!(!OutputMode::Quiet.shows_command_output());
    }

    #[test]
    fn silent_hides_status_and_spinners() {
        assert!(!OutputMode::Silent.shows_status());
        assert!(!OutputMode::Silent.shows_spinners());
        assert!(OutputMode::Quiet.shows_status());
        assert!(!OutputMode::Quiet.shows_spinners());
        assert!(OutputMode::Normal.shows_spinners());
    }
}
