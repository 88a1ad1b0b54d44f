// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! End-to-end scenarios for the relation picker view model, driven on a paused clock

use std::sync::Arc;
use std::time::Duration;

use evd_api_contract::RelationOption;
use evd_rest_mock_client::{MockCall, MockRestClient};
use evd_tui::view_model::CompletionOutcome;
use evd_tui::{PickerKey, PickerProps, SelectionChange};

mod common;

use common::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn typed_query_is_searched_once_after_quiet_period() {
        let mock = mock_with_venues();
        let (mut vm, _) = build_picker(
            PickerProps::new("Venue", VENUES).with_debounce_ms(300),
            Arc::new(mock.clone()),
        );
        vm.start();
        vm.settle().await;
        mock.clear_calls();

        for (i, c) in "jazz".chars().enumerate() {
            if i > 0 {
                tokio::time::advance(Duration::from_millis(100)).await;
                vm.tick();
            }
            vm.handle_key(PickerKey::Char(c));
        }

        tokio::time::advance(Duration::from_millis(299)).await;
        vm.tick();
        let_tasks_run().await;
        assert!(mock.search_calls().is_empty(), "no search before 300ms of silence");

        tokio::time::advance(Duration::from_millis(1)).await;
        vm.tick();
        let_tasks_run().await;
        vm.settle().await;

        let calls = mock.search_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].search_name(), Some("jazz"));
        let MockCall::Search { query, .. } = &calls[0] else {
            panic!("expected a search call");
        };
        assert!(query
            .to_query_pairs()
            .contains(&("filters[name]".to_string(), "jazz".to_string())));

        let names: Vec<&str> = vm.candidates().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Jazz Cellar", "Jazz Standard"]);
    }

    #[tokio::test(start_paused = true)]
    async fn bound_id_shows_resolved_label_without_typing() {
        let mock = mock_with_venues();
        let (mut vm, changes) = build_picker(PickerProps::new("Venue", VENUES), Arc::new(mock.clone()));
        vm.set_value([42]);
        vm.start();
        vm.settle().await;

        assert_eq!(vm.query(), "");
        let chips = vm.selected_chips();
        assert_eq!(chips.len(), 1);
        assert_eq!(chips[0].id, 42);
        assert_eq!(chips[0].label, "Blue Note");

        let resolves = mock.resolve_calls();
        assert_eq!(resolves, vec![MockCall::Resolve { endpoint: VENUES.to_string(), ids: vec![42] }]);
        assert!(changes_of(&changes).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn arrow_keys_clamp_at_both_ends() {
        let source = Arc::new(ScriptedSource::new(
            vec![
                RelationOption::new(1, "A"),
                RelationOption::new(2, "B"),
                RelationOption::new(3, "C"),
            ],
            Vec::new(),
        ));
        let (mut vm, _) = build_picker(PickerProps::new("Tag", "tags"), source);
        vm.start();
        vm.settle().await;
        vm.focus_input();

        for _ in 0..3 {
            vm.handle_key(PickerKey::Down);
        }
        assert_eq!(vm.focused_index(), Some(2));

        vm.handle_key(PickerKey::Down);
        assert_eq!(vm.focused_index(), Some(2));

        vm.handle_key(PickerKey::Up);
        vm.handle_key(PickerKey::Up);
        assert_eq!(vm.focused_index(), Some(0));

        vm.handle_key(PickerKey::Up);
        assert_eq!(vm.focused_index(), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn single_select_commit_clears_query_and_closes() {
        let mock = mock_with_venues();
        let (mut vm, changes) = build_picker(PickerProps::new("Venue", VENUES), Arc::new(mock.clone()));
        vm.start();
        vm.settle().await;

        type_text(&mut vm, "venue");
        vm.settle().await;
        assert_eq!(vm.candidates(), &[RelationOption::new(7, "Venue X")]);

        vm.handle_key(PickerKey::Down);
        vm.handle_key(PickerKey::Enter);

        assert_eq!(vm.selected_ids(), vec![7]);
        assert_eq!(vm.query(), "");
        assert!(!vm.is_open());
        assert!(vm.is_input_focused());
        assert_eq!(changes_of(&changes), vec![SelectionChange::Single(Some(7))]);

        vm.settle().await;
        assert_eq!(vm.selected_chips()[0].label, "Venue X");
        assert_eq!(changes_of(&changes).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn selection_label_wins_over_search_label() {
        let source = Arc::new(ScriptedSource::new(
            vec![
                RelationOption::new(9, "jazz cellar (old name)"),
                RelationOption::new(10, "Knitting Factory"),
            ],
            vec![RelationOption::new(9, "Jazz Cellar")],
        ));
        let (mut vm, _) = build_picker(PickerProps::new("Venues", VENUES).multi(), source);
        vm.set_value([9]);
        vm.start();
        vm.settle().await;

        let merged = &vm.reconciled().merged;
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get(&9).map(|o| o.name.as_str()), Some("Jazz Cellar"));
        assert_eq!(vm.candidates(), &[RelationOption::new(10, "Knitting Factory")]);
        assert_eq!(vm.label_for(9), "Jazz Cellar");
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_for_older_query_is_discarded() {
        let mock = MockRestClient::new()
            .with_collection(
                VENUES,
                vec![
                    RelationOption::new(1, "Alpha"),
                    RelationOption::new(2, "Abbey Road"),
                    RelationOption::new(3, "Cabaret"),
                    RelationOption::new(4, "Zebra"),
                ],
            )
            .with_search_delay("a", 1_000);
        let (mut vm, _) = build_picker(PickerProps::new("Venue", VENUES), Arc::new(mock.clone()));
        vm.start();
        vm.settle().await;

        type_text(&mut vm, "a");
        tokio::time::advance(Duration::from_millis(300)).await;
        vm.tick();
        let_tasks_run().await;
        assert_eq!(mock.search_calls().last().and_then(|c| c.search_name()), Some("a"));

        type_text(&mut vm, "b");
        vm.settle().await;

        let ab: Vec<String> = vm.candidates().iter().map(|o| o.name.clone()).collect();
        assert_eq!(ab, vec!["Abbey Road", "Cabaret"]);

        let outcome = vm.wait_for_completion().await;
        assert_eq!(outcome, Some(CompletionOutcome::Stale));
        let after: Vec<&str> = vm.candidates().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(after, ab);
        assert!(!vm.is_loading());
    }
}
