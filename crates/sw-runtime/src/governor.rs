use std::sync::Arc;

use rhai::{Dynamic, Engine};

use crate::state::ExecState;

/// Full collection fires when the branch counter reaches this value and
/// resets the epoch.
pub(crate) const FULL_COLLECTION_THRESHOLD: u32 = 550;
/// Incremental collections fire at positive multiples of this interval.
/// 550 is not a multiple of 100, so the two tiers never coincide.
pub(crate) const INCREMENTAL_COLLECTION_INTERVAL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BranchAction {
    Abort,
    CollectFull,
    CollectIncremental,
    Continue,
}

/// Decision taken at one branch boundary, in priority order: a pending
/// terminate request aborts before the counter is advanced.
pub(crate) fn branch_action(terminate: bool, branch_count: u32) -> BranchAction {
    if terminate {
        BranchAction::Abort
    } else if branch_count == FULL_COLLECTION_THRESHOLD {
        BranchAction::CollectFull
    } else if branch_count > 0 && branch_count % INCREMENTAL_COLLECTION_INTERVAL == 0 {
        BranchAction::CollectIncremental
    } else {
        BranchAction::Continue
    }
}

impl ExecState {
    /// One governor invocation: observe the terminate flag, otherwise pace
    /// collections. The engine reclaims by reference counting, so the two
    /// collection tiers are recorded as pacing events on the state.
    pub(crate) fn on_branch(&self) -> BranchAction {
        if self.terminate_requested() {
            return BranchAction::Abort;
        }

        let count = self.bump_branch_count();
        let action = branch_action(false, count);
        match action {
            BranchAction::CollectFull => {
                self.record_full_collection();
                self.reset_branch_count();
            }
            BranchAction::CollectIncremental => self.record_incremental_collection(),
            BranchAction::Abort | BranchAction::Continue => {}
        }
        action
    }
}

/// Install the governor as the engine's periodic progress hook, the only
/// point at which the host regains control inside a running script.
pub(crate) fn install_governor(engine: &mut Engine, state: Arc<ExecState>) {
    engine.on_progress(move |_operations| match state.on_branch() {
        BranchAction::Abort => Some(Dynamic::UNIT),
        BranchAction::CollectFull | BranchAction::CollectIncremental | BranchAction::Continue => {
            None
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminate_takes_priority_over_collections() {
        assert_eq!(branch_action(true, 0), BranchAction::Abort);
        assert_eq!(branch_action(true, 100), BranchAction::Abort);
        assert_eq!(
            branch_action(true, FULL_COLLECTION_THRESHOLD),
            BranchAction::Abort
        );
    }

    #[test]
    fn incremental_collections_fire_at_positive_multiples_of_100() {
        for count in [100, 200, 300, 400, 500] {
            assert_eq!(branch_action(false, count), BranchAction::CollectIncremental);
        }
        assert_eq!(branch_action(false, 0), BranchAction::Continue);
        assert_eq!(branch_action(false, 99), BranchAction::Continue);
        assert_eq!(branch_action(false, 101), BranchAction::Continue);
    }

    #[test]
    fn full_collection_fires_at_550_only() {
        assert_eq!(
            branch_action(false, FULL_COLLECTION_THRESHOLD),
            BranchAction::CollectFull
        );
        assert_eq!(branch_action(false, 549), BranchAction::Continue);
        assert_eq!(branch_action(false, 551), BranchAction::Continue);
    }

    #[test]
    fn exactly_one_action_fires_per_invocation() {
        let state = ExecState::new();
        let mut incremental = 0u64;
        let mut full = 0u64;

        // Two full epochs plus change.
        for _ in 0..1_200 {
            match state.on_branch() {
                BranchAction::CollectIncremental => incremental += 1,
                BranchAction::CollectFull => full += 1,
                BranchAction::Continue => {}
                BranchAction::Abort => panic!("no terminate was requested"),
            }
        }

        // Each 550-branch epoch requests five incrementals and one full.
        assert_eq!(full, 2);
        assert_eq!(incremental, 2 * 5);
        assert_eq!(state.branch_count(), 1_200 - 2 * 550);
        assert_eq!(state.gc_stats().full_collections, 2);
        assert_eq!(state.gc_stats().incremental_collections, 10);
    }

    #[test]
    fn full_collection_resets_the_epoch_counter() {
        let state = ExecState::new();
        for _ in 0..FULL_COLLECTION_THRESHOLD {
            state.on_branch();
        }
        assert_eq!(state.branch_count(), 0);
        assert_eq!(state.gc_stats().full_collections, 1);
    }

    #[test]
    fn abort_does_not_advance_the_counter() {
        let state = ExecState::new();
        state.on_branch();
        state.on_branch();
        state.request_terminate();
        assert_eq!(state.on_branch(), BranchAction::Abort);
        assert_eq!(state.branch_count(), 2);
    }
}
