//! Tests for DamageModel.

#[cfg(test)]
mod tests {
    use super::super::damage::*;
    use crate::components::Health;

    #[test]
    fn test_apply_damage_is_non_increasing_and_clamped() {
        let max = 100.0;
        let mut current = 0.0;
        while current <= max {
            let mut amount = 0.0;
            while amount <= 250.0 {
                let new = apply_damage(current, amount, max);
                assert!(new <= current, "current={} amount={} new={}", current, amount, new);
                assert!((0.0..=max).contains(&new), "new={} out of [0, {}]", new, max);
                amount += 12.5;
            }
            current += 10.0;
        }
    }

    #[test]
    fn test_negative_damage_does_not_heal() {
        assert_eq!(apply_damage(50.0, -20.0, 100.0), 50.0);
    }

    #[test]
    fn test_heal_clamped_to_max() {
        assert_eq!(heal(90.0, 30.0, 100.0), 100.0);
        assert_eq!(heal(10.0, 30.0, 100.0), 40.0);
        assert_eq!(heal(10.0, -5.0, 100.0), 10.0);
    }

    #[test]
    fn test_damage_events() {
        let mut health = Health::new(15.0);

        let events = damage(&mut health, 10.0, false);
        assert_eq!(health.current, 5.0);
        assert_eq!(events, vec![HealthEvent::DamageApplied { amount: 10.0, remaining: 5.0 }]);

        let events = damage(&mut health, 10.0, false);
        assert_eq!(health.current, 0.0);
        assert!(is_depleted(&events));
        // Фактически снято только 5
        assert_eq!(events[0], HealthEvent::DamageApplied { amount: 5.0, remaining: 0.0 });
    }

    #[test]
    fn test_depleted_reported_once() {
        let mut health = Health::new(10.0);
        assert!(is_depleted(&damage(&mut health, 10.0, false)));
        // Уже на нуле → урон применяется (0), но HealthDepleted не повторяется
        assert!(!is_depleted(&damage(&mut health, 10.0, false)));
    }

    #[test]
    fn test_terminal_rejects_damage_and_heal() {
        let mut health = Health::new(10.0);
        damage(&mut health, 4.0, false);

        assert!(damage(&mut health, 3.0, true).is_empty());
        assert!(restore(&mut health, 3.0, true).is_empty());
        assert_eq!(health.current, 6.0);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut health = Health::new(10.0);
        assert!(damage(&mut health, 0.0, false).is_empty());
        assert!(restore(&mut health, 0.0, false).is_empty());
        assert!(damage(&mut health, f32::NAN, false).is_empty());
    }

    #[test]
    fn test_restore_reports_effective_amount() {
        let mut health = Health::new(100.0);
        damage(&mut health, 10.0, false);

        let events = restore(&mut health, 30.0, false);
        assert_eq!(events, vec![HealthEvent::HealApplied { amount: 10.0, current: 100.0 }]);
    }
}
