//! Property tests for comma-separated list values

use mysite_conf::settings::env_parser::parse_list;
use proptest::prelude::*;

proptest! {
	/// Joined items come back in the same order
	#[test]
	fn prop_parse_list_preserves_order(items in prop::collection::vec("[a-z0-9.-]{1,20}", 0..10)) {
		let parsed = parse_list(&items.join(","));

		prop_assert_eq!(parsed, items);
	}

	/// Surrounding whitespace and empty items never survive
	#[test]
	fn prop_parse_list_trims_and_drops_empty(
		items in prop::collection::vec("[a-z]{0,8}", 0..10),
		pad in " {0,3}",
	) {
		let raw = items
			.iter()
			.map(|item| format!("{pad}{item}{pad}"))
			.collect::<Vec<_>>()
			.join(",");

		let parsed = parse_list(&raw);

		let expected: Vec<String> = items.into_iter().filter(|i| !i.is_empty()).collect();
		prop_assert_eq!(parsed, expected);
	}
}
