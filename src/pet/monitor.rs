//! Edge-triggered critical need tracking

use crate::pet::needs::{NeedType, NeedsState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeedTransition {
    EnteredCritical(NeedType),
    Recovered(NeedType),
}

/// Remembers which needs were critical at the last check
///
/// A need at or below the threshold is critical. Only changes are reported,
/// so a pet sitting at zero hunger raises one alert, not one per tick.
#[derive(Debug, Clone)]
pub struct CriticalMonitor {
    threshold: f32,
    was_critical: [bool; 4],
}

impl CriticalMonitor {
    pub fn new(threshold: f32) -> Self {
        Self { threshold, was_critical: [false; 4] }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_critical(&self, need: NeedType) -> bool {
        self.was_critical[need.index()]
    }

    pub fn check(&mut self, needs: &NeedsState) -> Vec<NeedTransition> {
        let mut transitions = Vec::new();
        for need in NeedType::ALL {
            let critical = needs.get(need) <= self.threshold;
            let flag = &mut self.was_critical[need.index()];
            if critical && !*flag {
                *flag = true;
                transitions.push(NeedTransition::EnteredCritical(need));
            } else if !critical && *flag {
                *flag = false;
                transitions.push(NeedTransition::Recovered(need));
            }
        }
        transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::needs::NeedDeltas;

    #[test]
    fn test_reports_edges_only() {
        let mut monitor = CriticalMonitor::new(10.0);
        let mut needs = NeedsState::default().with_value(NeedType::Thirst, 5.0);

        assert_eq!(
            monitor.check(&needs),
            vec![NeedTransition::EnteredCritical(NeedType::Thirst)]
        );
        assert!(monitor.check(&needs).is_empty());
        assert!(monitor.is_critical(NeedType::Thirst));

        needs.restore(NeedDeltas::new(0.0, 30.0, 0.0, 0.0));
        assert_eq!(monitor.check(&needs), vec![NeedTransition::Recovered(NeedType::Thirst)]);
        assert!(monitor.check(&needs).is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut monitor = CriticalMonitor::new(10.0);
        let needs = NeedsState::default().with_value(NeedType::Energy, 10.0);
        assert_eq!(monitor.check(&needs), vec![NeedTransition::EnteredCritical(NeedType::Energy)]);
    }

    #[test]
    fn test_several_needs_in_declaration_order() {
        let mut monitor = CriticalMonitor::new(10.0);
        let mut needs = NeedsState::default();
        needs.advance_time(1_000.0);

        let all: Vec<_> = NeedType::ALL.into_iter().map(NeedTransition::EnteredCritical).collect();
        assert_eq!(monitor.check(&needs), all);
    }
}
