//! Order lifecycle: `New → InProgress → QualityControl → Completed → Shipped`.
//!
//! Each status maps to a fixed [`LifecycleState`] row. Stepping past either end
//! of the line is a self-loop, so transitions never fail; callers check
//! `can_advance` / `can_revert` first when they need to know whether a step
//! will actually move the order.

use serde::Serialize;

use crate::models::OrderStatus;

/// Behavior of one lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LifecycleState {
    pub status: OrderStatus,
    pub label: &'static str,
    pub can_advance: bool,
    pub can_revert: bool,
    pub next: OrderStatus,
    pub previous: OrderStatus,
}

const STATES: [LifecycleState; 5] = [
    LifecycleState {
        status: OrderStatus::New,
        label: "New",
        can_advance: true,
        can_revert: false,
        next: OrderStatus::InProgress,
        previous: OrderStatus::New,
    },
    LifecycleState {
        status: OrderStatus::InProgress,
        label: "In Progress",
        can_advance: true,
        can_revert: true,
        next: OrderStatus::QualityControl,
        previous: OrderStatus::New,
    },
    LifecycleState {
        status: OrderStatus::QualityControl,
        label: "Quality Control",
        can_advance: true,
        can_revert: true,
        next: OrderStatus::Completed,
        previous: OrderStatus::InProgress,
    },
    LifecycleState {
        status: OrderStatus::Completed,
        label: "Completed",
        can_advance: true,
        can_revert: true,
        next: OrderStatus::Shipped,
        previous: OrderStatus::QualityControl,
    },
    LifecycleState {
        status: OrderStatus::Shipped,
        label: "Shipped",
        can_advance: false,
        can_revert: true,
        next: OrderStatus::Shipped,
        previous: OrderStatus::Completed,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

/// Look up the behavior row for a status
pub fn state_of(status: OrderStatus) -> &'static LifecycleState {
    let index = match status {
        OrderStatus::New => 0,
        OrderStatus::InProgress => 1,
        OrderStatus::QualityControl => 2,
        OrderStatus::Completed => 3,
        OrderStatus::Shipped => 4,
    };
    &STATES[index]
}

impl LifecycleState {
    pub fn allows(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.can_advance,
            Direction::Backward => self.can_revert,
        }
    }

    pub fn target(&self, direction: Direction) -> OrderStatus {
        match direction {
            Direction::Forward => self.next,
            Direction::Backward => self.previous,
        }
    }
}

impl OrderStatus {
    pub fn label(self) -> &'static str {
        state_of(self).label
    }

    pub fn can_advance(self) -> bool {
        state_of(self).can_advance
    }

    pub fn can_revert(self) -> bool {
        state_of(self).can_revert
    }

    pub fn next(self) -> OrderStatus {
        state_of(self).next
    }

    pub fn previous(self) -> OrderStatus {
        state_of(self).previous
    }

    pub fn step(self, direction: Direction) -> OrderStatus {
        state_of(self).target(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_self_loops() {
        assert_eq!(OrderStatus::New.previous(), OrderStatus::New);
        assert_eq!(OrderStatus::Shipped.next(), OrderStatus::Shipped);
        assert!(!OrderStatus::New.can_revert());
        assert!(!OrderStatus::Shipped.can_advance());
    }

    #[test]
    fn test_forward_walk_reaches_shipped() {
        let mut status = OrderStatus::New;
        for _ in 0..4 {
            assert!(status.can_advance());
            status = status.next();
        }
        assert_eq!(status, OrderStatus::Shipped);
    }

    #[test]
    fn test_backward_walk_reaches_new() {
        let mut status = OrderStatus::Shipped;
        for _ in 0..4 {
            assert!(status.can_revert());
            status = status.previous();
        }
        assert_eq!(status, OrderStatus::New);
    }

    #[test]
    fn test_neighbours_are_adjacent() {
        for pair in OrderStatus::ALL.windows(2) {
            assert_eq!(pair[0].next(), pair[1]);
            assert_eq!(pair[1].previous(), pair[0]);
        }
    }

    #[test]
    fn test_table_rows_match_status() {
        for status in OrderStatus::ALL {
            assert_eq!(state_of(status).status, status);
        }
    }

    #[test]
    fn test_step_by_direction() {
        let state = state_of(OrderStatus::QualityControl);
        assert!(state.allows(Direction::Forward));
        assert!(state.allows(Direction::Backward));
        assert_eq!(OrderStatus::QualityControl.step(Direction::Forward), OrderStatus::Completed);
        assert_eq!(OrderStatus::QualityControl.step(Direction::Backward), OrderStatus::InProgress);
    }

    #[test]
    fn test_labels() {
        assert_eq!(OrderStatus::InProgress.label(), "In Progress");
        assert_eq!(OrderStatus::QualityControl.to_string(), "Quality Control");
    }
}
