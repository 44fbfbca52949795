use chrono::{Local, NaiveTime, Timelike};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::models::{Building, Slot, Status};

/// Operating-hours rules used when deriving statuses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolverPolicy {
    pub closing_time: NaiveTime,
    /// How far ahead a slot may start and still count as upcoming.
    /// `None` means anything before closing.
    pub upcoming_window: Option<chrono::Duration>,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            closing_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
            upcoming_window: None,
        }
    }
}

impl ResolverPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            closing_time: config.closing_time,
            upcoming_window: config.upcoming_window,
        }
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        // Drop sub-second precision so comparisons against wire times are stable.
        Local::now().time().with_nanosecond(0).unwrap_or_default()
    }
}

pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

/// Timing of a single slot relative to `now`, ignoring what the backend marked it as.
///
/// Unparsable or inverted intervals are reported as unavailable.
pub fn slot_status(slot: &Slot, now: NaiveTime, policy: &ResolverPolicy) -> Status {
    let (Some(start), Some(end)) = (slot.start(), slot.end()) else {
        warn!("unparsable slot times {:?} - {:?}", slot.start_time, slot.end_time);
        return Status::Unavailable;
    };
    if end <= start {
        warn!("slot ends before it starts: {} - {}", slot.start_time, slot.end_time);
        return Status::Unavailable;
    }

    if start <= now && now < end {
        return Status::Available;
    }

    if start > now && start < policy.closing_time {
        let within_window = match policy.upcoming_window {
            Some(window) => start - now < window,
            None => true,
        };
        if within_window {
            return Status::Upcoming;
        }
    }

    Status::Unavailable
}

/// Room status from its slots.
pub fn resolve(slots: &[Slot], now: NaiveTime, policy: &ResolverPolicy) -> Status {
    let mut best = Status::Unavailable;
    for slot in slots {
        match slot_status(slot, now, policy) {
            Status::Available if slot.status == Status::Available => return Status::Available,
            Status::Upcoming => best = Status::Upcoming,
            _ => {}
        }
    }
    best
}

/// Building status from its room statuses. An empty set is unavailable.
pub fn aggregate<I>(statuses: I) -> Status
where
    I: IntoIterator<Item = Status>,
{
    statuses
        .into_iter()
        .fold(Status::Unavailable, |best, status| best.max(status))
}

/// Re-derives every room status and the building status in place.
pub fn resolve_building(building: &mut Building, now: NaiveTime, policy: &ResolverPolicy) -> Status {
    for (room_id, room) in building.rooms.iter_mut() {
        let derived = resolve(&room.slots, now, policy);
        if room.room_status != derived {
            debug!(
                "room {} {}: backend said {}, derived {}",
                building.code, room_id, room.room_status, derived
            );
        }
        room.room_status = derived;
    }

    let derived = aggregate(building.rooms.values().map(|room| room.room_status));
    if building.status != derived {
        debug!("building {}: backend said {}, derived {}", building.code, building.status, derived);
    }
    building.status = derived;
    derived
}

pub fn resolve_all(buildings: &mut [Building], now: NaiveTime, policy: &ResolverPolicy) {
    for building in buildings.iter_mut() {
        resolve_building(building, now, policy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn slot(start: &str, end: &str, status: Status) -> Slot {
        Slot::new(start, end, status)
    }

    #[test]
    fn active_available_slot_makes_room_available() {
        let slots = vec![
            slot("08:00", "09:00", Status::Unavailable),
            slot("09:00", "10:00", Status::Available),
        ];
        assert_eq!(resolve(&slots, at(9, 30), &ResolverPolicy::default()), Status::Available);
    }

    #[test]
    fn active_slot_not_marked_available_does_not_count() {
        let slots = vec![slot("09:00:00", "10:00:00", Status::Unavailable)];
        assert_eq!(resolve(&slots, at(9, 30), &ResolverPolicy::default()), Status::Unavailable);
    }

    #[test]
    fn interval_is_half_open() {
        let slots = vec![slot("09:00", "10:00", Status::Available)];
        let policy = ResolverPolicy::default();
        assert_eq!(resolve(&slots, at(9, 0), &policy), Status::Available);
        assert_eq!(resolve(&slots, at(10, 0), &policy), Status::Unavailable);
    }

    #[test]
    fn future_slot_within_configured_window_is_upcoming() {
        let slots = vec![slot("10:10", "11:00", Status::Upcoming)];
        let policy = ResolverPolicy {
            upcoming_window: Some(chrono::Duration::minutes(20)),
            ..ResolverPolicy::default()
        };
        assert_eq!(resolve(&slots, at(10, 0), &policy), Status::Upcoming);
        assert_eq!(resolve(&slots, at(9, 0), &policy), Status::Unavailable);
    }

    #[test]
    fn default_policy_counts_anything_before_closing() {
        let policy = ResolverPolicy::from_config(&AppConfig::new("http://localhost:5000"));
        assert_eq!(policy, ResolverPolicy::default());
        assert_eq!(
            resolve(&[slot("15:00", "16:00", Status::Available)], at(8, 0), &policy),
            Status::Upcoming
        );
        assert_eq!(
            resolve(&[slot("15:00", "16:00", Status::Unavailable)], at(8, 0), &policy),
            Status::Upcoming
        );
        assert_eq!(
            resolve(&[slot("22:30", "23:00", Status::Unavailable)], at(8, 0), &policy),
            Status::Unavailable
        );
    }

    #[test]
    fn empty_slots_are_unavailable() {
        assert_eq!(resolve(&[], at(12, 0), &ResolverPolicy::default()), Status::Unavailable);
    }

    #[test]
    fn malformed_times_do_not_poison_the_room() {
        let slots = vec![
            slot("9am", "10:00", Status::Available),
            slot("11:00", "10:00", Status::Available),
            slot("12:00", "13:00", Status::Available),
        ];
        let policy = ResolverPolicy::default();
        assert_eq!(resolve(&slots[..2], at(9, 30), &policy), Status::Unavailable);
        assert_eq!(resolve(&slots, at(9, 30), &policy), Status::Upcoming);
        assert_eq!(resolve(&slots, at(12, 30), &policy), Status::Available);
    }

    #[test]
    fn building_is_available_iff_a_room_is() {
        let all = [Status::Available, Status::Upcoming, Status::Unavailable, Status::Unknown];
        for a in all {
            for b in all {
                for c in all {
                    let result = aggregate([a, b, c]);
                    let any_available = [a, b, c].contains(&Status::Available);
                    assert_eq!(result == Status::Available, any_available, "{a} {b} {c}");
                    if !any_available {
                        let any_upcoming = [a, b, c].contains(&Status::Upcoming);
                        let expected = if any_upcoming { Status::Upcoming } else { Status::Unavailable };
                        assert_eq!(result, expected);
                    }
                }
            }
        }
        assert_eq!(aggregate(Vec::<Status>::new()), Status::Unavailable);
    }

    #[test]
    fn backend_statuses_are_overridden() {
        let mut building = Building::new("VAL", "Valders")
            .with_room("206", vec![slot("09:00", "10:00", Status::Available)])
            .with_room("301", vec![]);
        building.status = Status::Available;
        building.rooms.get_mut("301").unwrap().room_status = Status::Available;

        let status = resolve_building(&mut building, at(11, 0), &ResolverPolicy::default());
        assert_eq!(status, Status::Unavailable);
        assert_eq!(building.rooms["301"].room_status, Status::Unavailable);
        assert_eq!(building.rooms["206"].room_status, Status::Unavailable);
    }

    #[test]
    fn empty_building_degrades_to_unavailable() {
        let mut building = Building::new("EMPTY", "Empty Hall").with_coords(43.0, -91.0);
        assert_eq!(resolve_building(&mut building, at(12, 0), &ResolverPolicy::default()), Status::Unavailable);
    }
}
