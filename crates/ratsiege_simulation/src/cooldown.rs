//! CooldownScheduler: тик-driven таймеры "включить обратно через N секунд"
//!
//! Заменяет все отложенные действия (attack cooldown, ожидание на walk point,
//! reload, восстановление из ragdoll, деспавн после gib, game over delay).
//!
//! Правила:
//! - Один активный таймер на ключ: повторный `start` заменяет старый (last-writer-wins)
//! - `tick(delta)` получает elapsed time от вызывающего (сам часы не читает)
//! - Истёкший ключ возвращается ровно один раз и удаляется
//! - `advance` + `take_expired`: время тика идёт только таймерам, запущенным
//!   до него. Таймер, запущенный между ними, стартует с полной длительностью.
//!
//! Действие "on expire" определяется ключом: владелец таймеров маппит
//! истёкший ключ на эффект (CooldownKind::Attack → can_attack = true и т.д.).

use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq)]
pub struct CooldownScheduler<K> {
    /// (key, remaining seconds) в порядке запуска: детерминированный порядок expire
    timers: Vec<(K, f32)>,
    /// Истекли в `advance`, ещё не забраны `take_expired`
    expired: Vec<K>,
}

impl<K> Default for CooldownScheduler<K> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            expired: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq + Debug> CooldownScheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Запустить (или перезапустить) таймер для ключа.
    ///
    /// Отрицательная длительность трактуется как 0: таймер истечёт на следующем тике.
    pub fn start(&mut self, key: K, duration: f32) {
        let duration = duration.max(0.0);
        self.forget(key);
        self.timers.push((key, duration));
    }

    /// Отменить таймер без вызова expire. Возвращает true если таймер был активен.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.timers.len() + self.expired.len();
        self.forget(key);
        before != self.timers.len() + self.expired.len()
    }

    fn forget(&mut self, key: K) {
        self.timers.retain(|(k, _)| *k != key);
        self.expired.retain(|k| *k != key);
    }

    pub fn is_running(&self, key: K) -> bool {
        self.timers.iter().any(|(k, _)| *k == key) || self.expired.contains(&key)
    }

    pub fn remaining(&self, key: K) -> Option<f32> {
        self.timers
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, remaining)| *remaining)
            .or_else(|| self.expired.contains(&key).then_some(0.0))
    }

    pub fn active_count(&self) -> usize {
        self.timers.len() + self.expired.len()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
        self.expired.clear();
    }

    /// Продвинуть все таймеры на `delta` секунд и забрать истёкшие.
    ///
    /// Возвращает ключи, пересёкшие ноль на этом тике (в порядке запуска).
    pub fn tick(&mut self, delta: f32) -> Vec<K> {
        self.advance(delta);
        self.take_expired()
    }

    /// Продвинуть таймеры, истёкшие откладываются до `take_expired`.
    pub fn advance(&mut self, delta: f32) {
        let delta = delta.max(0.0);
        let expired = &mut self.expired;

        self.timers.retain_mut(|(key, remaining)| {
            *remaining -= delta;
            if *remaining <= 0.0 {
                expired.push(*key);
                false
            } else {
                true
            }
        });
    }

    /// Истёкшие с прошлого вызова (в порядке запуска)
    pub fn take_expired(&mut self) -> Vec<K> {
        std::mem::take(&mut self.expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Key {
        Attack,
        Wait,
    }

    #[test]
    fn test_timer_expires_once() {
        let mut scheduler = CooldownScheduler::new();
        scheduler.start(Key::Attack, 1.0);

        assert!(scheduler.tick(0.5).is_empty());
        assert!(scheduler.is_running(Key::Attack));

        assert_eq!(scheduler.tick(0.5), vec![Key::Attack]);
        assert!(!scheduler.is_running(Key::Attack));

        // Больше не срабатывает
        assert!(scheduler.tick(10.0).is_empty());
    }

    #[test]
    fn test_restart_replaces_instead_of_stacking() {
        let mut scheduler = CooldownScheduler::new();
        scheduler.start(Key::Attack, 1.0);
        scheduler.tick(0.8);
        assert!((scheduler.remaining(Key::Attack).unwrap() - 0.2).abs() < 1e-5);

        // Перезапуск до истечения → remaining = новая длительность
        scheduler.start(Key::Attack, 2.0);
        assert_eq!(scheduler.remaining(Key::Attack), Some(2.0));
        assert_eq!(scheduler.active_count(), 1);

        // Старый таймер не "всплывает" через 0.2 сек
        assert!(scheduler.tick(0.3).is_empty());
        assert!(scheduler.tick(1.5).is_empty());
        assert_eq!(scheduler.tick(0.25), vec![Key::Attack]);
    }

    #[test]
    fn test_restart_for_any_elapsed_fraction() {
        for step in 1..10 {
            let elapsed = step as f32 * 0.1;
            let mut scheduler = CooldownScheduler::new();
            scheduler.start(Key::Wait, 1.0);
            scheduler.tick(elapsed);
            scheduler.start(Key::Wait, 1.5);
            assert_eq!(scheduler.remaining(Key::Wait), Some(1.5), "elapsed = {}", elapsed);
        }
    }

    #[test]
    fn test_independent_keys() {
        let mut scheduler = CooldownScheduler::new();
        scheduler.start(Key::Attack, 1.0);
        scheduler.start(Key::Wait, 0.25);

        assert_eq!(scheduler.tick(0.25), vec![Key::Wait]);
        assert!(scheduler.is_running(Key::Attack));
        assert_eq!(scheduler.tick(0.75), vec![Key::Attack]);
    }

    #[test]
    fn test_cancel_suppresses_expire() {
        let mut scheduler = CooldownScheduler::new();
        scheduler.start(Key::Attack, 0.1);
        assert!(scheduler.cancel(Key::Attack));
        assert!(!scheduler.cancel(Key::Attack));
        assert!(scheduler.tick(1.0).is_empty());
    }

    #[test]
    fn test_zero_duration_expires_next_tick() {
        let mut scheduler = CooldownScheduler::new();
        scheduler.start(Key::Wait, -3.0);
        assert_eq!(scheduler.remaining(Key::Wait), Some(0.0));
        assert_eq!(scheduler.tick(0.0), vec![Key::Wait]);
    }

    #[test]
    fn test_timer_started_after_advance_gets_full_duration() {
        let mut scheduler = CooldownScheduler::new();
        scheduler.start(Key::Wait, 0.25);

        // Тик: сначала время, потом новый таймер, потом expire
        scheduler.advance(0.25);
        scheduler.start(Key::Attack, 1.0);
        assert_eq!(scheduler.take_expired(), vec![Key::Wait]);
        assert_eq!(scheduler.remaining(Key::Attack), Some(1.0));

        for _ in 0..3 {
            scheduler.advance(0.25);
            assert!(scheduler.take_expired().is_empty());
        }
        scheduler.advance(0.25);
        assert_eq!(scheduler.take_expired(), vec![Key::Attack]);
    }

    #[test]
    fn test_restart_between_advance_and_take_drops_expiry() {
        let mut scheduler = CooldownScheduler::new();
        scheduler.start(Key::Attack, 0.1);
        scheduler.advance(0.5);
        assert!(scheduler.is_running(Key::Attack));

        scheduler.start(Key::Attack, 1.0);
        assert!(scheduler.take_expired().is_empty());
        assert_eq!(scheduler.remaining(Key::Attack), Some(1.0));
    }
}
