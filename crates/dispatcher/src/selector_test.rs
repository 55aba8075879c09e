#[cfg(test)]
mod selector_tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::selector::*;
    use beacon_core::{Device, DeviceId};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn create_test_device(
        name: &str,
        created_offset_secs: i64,
        triggered_offset_secs: Option<i64>,
    ) -> Device {
        let created_at = base_time() + Duration::seconds(created_offset_secs);
        Device {
            id: DeviceId::new(),
            name: name.to_string(),
            created_at,
            last_updated: created_at,
            last_triggered: triggered_offset_secs.map(|s| base_time() + Duration::seconds(s)),
        }
    }

    #[test]
    fn test_empty_set_returns_none() {
        let selector = LeastRecentlyTriggeredSelector::new();
        assert!(selector.select(&[]).is_none());
    }

    #[test]
    fn test_selects_smallest_last_triggered() {
        let selector = LeastRecentlyTriggeredSelector::new();
        let devices = vec![
            create_test_device("device1", 0, Some(300)),
            create_test_device("device2", 1, Some(100)),
            create_test_device("device3", 2, Some(200)),
        ];

        let selected = selector.select(&devices).unwrap();
        assert_eq!(selected.name, "device2"); // 应该选择最久未触发的
    }

    #[test]
    fn test_never_triggered_is_most_eligible() {
        let selector = LeastRecentlyTriggeredSelector::new();
        let devices = vec![
            create_test_device("old", 0, Some(-1_000_000)),
            create_test_device("fresh", 5, None),
        ];

        let selected = selector.select(&devices).unwrap();
        assert_eq!(selected.name, "fresh");
    }

    #[test]
    fn test_ties_broken_by_registration_order() {
        let selector = LeastRecentlyTriggeredSelector::new();
        let devices = vec![
            create_test_device("late", 20, None),
            create_test_device("early", 10, None),
            create_test_device("triggered", 0, Some(50)),
        ];

        let selected = selector.select(&devices).unwrap();
        assert_eq!(selected.name, "early");

        let mut same_time = vec![
            create_test_device("a", 30, Some(60)),
            create_test_device("b", 40, Some(60)),
        ];
        assert_eq!(selector.select(&same_time).unwrap().name, "a");
        same_time.reverse();
        assert_eq!(selector.select(&same_time).unwrap().name, "a");
    }

    #[test]
    fn test_selection_independent_of_input_order() {
        let selector = LeastRecentlyTriggeredSelector::new();
        let mut devices = vec![
            create_test_device("device1", 0, Some(30)),
            create_test_device("device2", 1, None),
            create_test_device("device3", 2, None),
            create_test_device("device4", 3, Some(10)),
        ];

        let first = selector.select(&devices).unwrap().id;
        // 重复调用结果不变
        assert_eq!(selector.select(&devices).unwrap().id, first);

        devices.reverse();
        assert_eq!(selector.select(&devices).unwrap().id, first);
        devices.rotate_left(1);
        assert_eq!(selector.select(&devices).unwrap().id, first);
    }

    #[test]
    fn test_selected_is_minimal_across_set() {
        let selector = LeastRecentlyTriggeredSelector::new();
        let devices: Vec<Device> = (0..20)
            .map(|i| {
                let triggered = if i % 7 == 3 { None } else { Some(i * 37 % 11) };
                create_test_device(&format!("device{i}"), i, triggered)
            })
            .collect();

        let selected = selector.select(&devices).unwrap();
        for device in &devices {
            assert!(selected.recency_key() <= device.recency_key());
        }
        assert!(selected.last_triggered.is_none());
    }

    #[test]
    fn test_selector_name() {
        assert_eq!(
            LeastRecentlyTriggeredSelector::new().name(),
            "LeastRecentlyTriggered"
        );
    }
}
