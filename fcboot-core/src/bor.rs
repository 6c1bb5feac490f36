// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Brownout guard: one-shot option-byte safety configuration.
//!
//! Some power sources (switching BECs in particular) sag enough on startup
//! that a low brown-out threshold leaves the board in an undefined state, so
//! the threshold is forced to a known level before anything else runs. This
//! is the only place in the bootloader that busy-waits without a timeout: it
//! happens once, pre-loop, and if the flash controller never goes idle here
//! the hardware is unusable regardless of software.

/// Persistent option-byte region holding the brown-out threshold.
pub trait OptionBytes {
    /// Currently programmed brown-out level.
    fn brownout_level(&self) -> u8;
    /// Unlock the option-byte configuration region for writing.
    fn unlock(&mut self);
    /// Stage the new brown-out level.
    fn set_brownout_level(&mut self, level: u8);
    /// Start programming the staged configuration.
    fn commit(&mut self);
    /// Re-lock the configuration region.
    fn lock(&mut self);
    /// Whether the flash controller is still programming.
    fn is_busy(&self) -> bool;
}

/// Ensure the brown-out threshold equals `target`, programming it if not.
pub fn ensure_brownout_level<O: OptionBytes>(ob: &mut O, target: u8) {
    if ob.brownout_level() == target {
        return;
    }
    ob.unlock();
    ob.set_brownout_level(target);
    ob.commit();
    while ob.is_busy() {
        core::hint::spin_loop();
    }
    ob.lock();
    while ob.is_busy() {
        core::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[derive(Default)]
    struct FakeOptionBytes {
        level: u8,
        unlocked: bool,
        locked_after: bool,
        commits: u32,
        // Cell because the busy flag is consumed through `&self` polls.
        busy_polls: Cell<u32>,
    }

    impl OptionBytes for FakeOptionBytes {
        fn brownout_level(&self) -> u8 {
            self.level
        }
        fn unlock(&mut self) {
            self.unlocked = true;
        }
        fn set_brownout_level(&mut self, level: u8) {
            assert!(self.unlocked, "wrote level while locked");
            self.level = level;
        }
        fn commit(&mut self) {
            self.commits += 1;
            self.busy_polls.set(3);
        }
        fn lock(&mut self) {
            self.locked_after = true;
        }
        fn is_busy(&self) -> bool {
            let remaining = self.busy_polls.get();
            if remaining > 0 {
                self.busy_polls.set(remaining - 1);
                true
            } else {
                false
            }
        }
    }

    #[test]
    fn already_at_target_is_a_noop() {
        let mut ob = FakeOptionBytes {
            level: 0,
            ..Default::default()
        };
        ensure_brownout_level(&mut ob, 0);
        assert_eq!(ob.commits, 0);
        assert!(!ob.unlocked);
        assert!(!ob.locked_after);
    }

    #[test]
    fn reprograms_and_relocks_when_level_differs() {
        let mut ob = FakeOptionBytes {
            level: 3,
            ..Default::default()
        };
        ensure_brownout_level(&mut ob, 0);
        assert_eq!(ob.level, 0);
        assert_eq!(ob.commits, 1);
        assert!(ob.unlocked);
        assert!(ob.locked_after);
        assert_eq!(ob.busy_polls.get(), 0, "waited out the busy condition");
    }
}
