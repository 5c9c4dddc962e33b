//! Overwrite arbitration.
//!
//! Existing files are never clobbered silently. Two persistent flags decide
//! most cases; when neither does, the decision defers to a prompt, and an
//! "all" reply latches the matching flag for the rest of the run.

use std::path::Path;

/// A reply to the overwrite question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteChoice {
    /// Overwrite this file.
    Yes,
    /// Keep this file.
    No,
    /// Overwrite this and every later file.
    YesAll,
    /// Keep this and every later file.
    NoAll,
}

/// What to do with the current output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Write,
    Skip,
}

/// Asks whether an existing file may be overwritten.
///
/// The engine stays headless: interactive callers plug in a real prompt,
/// scripted callers preset the policy flags and plug in [`DenyPrompt`].
pub trait OverwritePrompt {
    fn ask(&self, path: &Path) -> OverwriteChoice;
}

/// Always answers [`OverwriteChoice::No`]; for embeddings that must never
/// block on input.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyPrompt;

impl OverwritePrompt for DenyPrompt {
    fn ask(&self, _path: &Path) -> OverwriteChoice {
        OverwriteChoice::No
    }
}

/// The per-run overwrite state machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct OverwritePolicy {
    force_overwrite: bool,
    skip_existing: bool,
}

impl OverwritePolicy {
    pub fn new(force_overwrite: bool, skip_existing: bool) -> Self {
        OverwritePolicy {
            force_overwrite,
            skip_existing,
        }
    }

    pub fn force_overwrite(&self) -> bool {
        self.force_overwrite
    }

    pub fn skip_existing(&self) -> bool {
        self.skip_existing
    }

    /// Decide the fate of `path`.
    ///
    /// Missing files write without a question. For existing files,
    /// `force_overwrite` wins over `skip_existing`, and when neither flag is
    /// set the prompt answers; an "all" reply upgrades to the corresponding
    /// flag before the decision is returned.
    pub fn decide(&mut self, path: &Path, exists: bool, prompt: &dyn OverwritePrompt) -> Decision {
        if !exists {
            return Decision::Write;
        }
        if self.force_overwrite {
            return Decision::Write;
        }
        if self.skip_existing {
            return Decision::Skip;
        }
        match prompt.ask(path) {
            OverwriteChoice::Yes => Decision::Write,
            OverwriteChoice::No => Decision::Skip,
            OverwriteChoice::YesAll => {
                self.force_overwrite = true;
                Decision::Write
            }
            OverwriteChoice::NoAll => {
                self.skip_existing = true;
                Decision::Skip
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::path::PathBuf;

    struct Scripted {
        replies: RefCell<VecDeque<OverwriteChoice>>,
    }

    impl Scripted {
        fn new(replies: &[OverwriteChoice]) -> Self {
            Scripted {
                replies: RefCell::new(replies.iter().copied().collect()),
            }
        }

        fn remaining(&self) -> usize {
            self.replies.borrow().len()
        }
    }

    impl OverwritePrompt for Scripted {
        fn ask(&self, _path: &Path) -> OverwriteChoice {
            self.replies
                .borrow_mut()
                .pop_front()
                .expect("prompt asked more often than scripted")
        }
    }

    struct NeverAsked;

    impl OverwritePrompt for NeverAsked {
        fn ask(&self, path: &Path) -> OverwriteChoice {
            panic!("prompt must not be consulted for {}", path.display());
        }
    }

    fn path() -> PathBuf {
        PathBuf::from("out.ttg")
    }

    #[test]
    fn missing_files_write_without_asking() {
        let mut policy = OverwritePolicy::default();
        assert_eq!(policy.decide(&path(), false, &NeverAsked), Decision::Write);
    }

    #[test]
    fn force_overwrite_writes_without_asking() {
        let mut policy = OverwritePolicy::new(true, false);
        assert_eq!(policy.decide(&path(), true, &NeverAsked), Decision::Write);
    }

    #[test]
    fn skip_existing_skips_without_asking() {
        let mut policy = OverwritePolicy::new(false, true);
        assert_eq!(policy.decide(&path(), true, &NeverAsked), Decision::Skip);
    }

    #[test]
    fn force_wins_when_both_flags_are_set() {
        let mut policy = OverwritePolicy::new(true, true);
        assert_eq!(policy.decide(&path(), true, &NeverAsked), Decision::Write);
    }

    #[test]
    fn single_replies_do_not_latch() {
        let prompt = Scripted::new(&[OverwriteChoice::Yes, OverwriteChoice::No]);
        let mut policy = OverwritePolicy::default();
        assert_eq!(policy.decide(&path(), true, &prompt), Decision::Write);
        assert_eq!(policy.decide(&path(), true, &prompt), Decision::Skip);
        assert_eq!(prompt.remaining(), 0);
    }

    #[test]
    fn yes_all_latches_force_overwrite() {
        let prompt = Scripted::new(&[OverwriteChoice::YesAll]);
        let mut policy = OverwritePolicy::default();
        assert_eq!(policy.decide(&path(), true, &prompt), Decision::Write);
        assert!(policy.force_overwrite());
        // later existing files never reach a prompt
        assert_eq!(policy.decide(&path(), true, &NeverAsked), Decision::Write);
    }

    #[test]
    fn no_all_latches_skip_existing() {
        let prompt = Scripted::new(&[OverwriteChoice::NoAll]);
        let mut policy = OverwritePolicy::default();
        assert_eq!(policy.decide(&path(), true, &prompt), Decision::Skip);
        assert!(policy.skip_existing());
        assert_eq!(policy.decide(&path(), true, &NeverAsked), Decision::Skip);
    }
}
