//! Search capture and next/previous match bindings.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use keygrid_config::SearchTriggers;

use super::MoveVerdict;
use crate::hotkeys::{
    ActionId, ContextId, Dispatch, HotkeyEngine, HotkeyError, HotkeyOptions, HotkeyRegistration,
};
use crate::search::SearchResults;

type UpdateCallback<T> = Rc<RefCell<Box<dyn FnMut(&SearchUpdate<'_, T>) -> MoveVerdict>>>;

/// The match a search binding moved to.
#[derive(Debug)]
pub struct SearchUpdate<'a, T> {
    pub item: &'a T,
    /// Position among the matches.
    pub index: usize,
    /// Index of `item` in the pool.
    pub pool_index: usize,
    /// Number of matches.
    pub total: usize,
    pub query: &'a str,
}

#[derive(Debug, Clone, Copy)]
enum SearchStep {
    Query,
    Next,
    Previous,
}

/// Registers the search capture and the next/previous match bindings.
pub struct SearchHotkeys<T> {
    results: Rc<RefCell<SearchResults<T>>>,
    triggers: SearchTriggers,
    live: Option<Box<dyn FnMut(&str)>>,
    on_update: Option<Box<dyn FnMut(&SearchUpdate<'_, T>) -> MoveVerdict>>,
}

impl<T> fmt::Debug for SearchHotkeys<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchHotkeys")
            .field("triggers", &self.triggers)
            .field("live", &self.live.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: 'static> SearchHotkeys<T> {
    pub fn new(results: Rc<RefCell<SearchResults<T>>>, triggers: &SearchTriggers) -> Self {
        Self {
            results,
            triggers: triggers.clone(),
            live: None,
            on_update: None,
        }
    }

    /// Receive the partial query on every keystroke of the capture.
    pub fn live<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&str) + 'static,
    {
        self.live = Some(Box::new(handler));
        self
    }

    /// Called whenever the current match changes; `Reject` restores the
    /// previous query and cursor. The results stay borrowed while it runs.
    pub fn on_update<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&SearchUpdate<'_, T>) -> MoveVerdict + 'static,
    {
        self.on_update = Some(Box::new(callback));
        self
    }

    /// Register the bindings with non-empty triggers in `context`.
    pub fn register<A: ActionId>(
        self,
        engine: &mut HotkeyEngine<A>,
        context: ContextId,
    ) -> Result<(), HotkeyError> {
        let Self {
            results,
            triggers,
            live,
            on_update,
        } = self;
        let on_update: UpdateCallback<T> = Rc::new(RefCell::new(
            on_update.unwrap_or_else(|| Box::new(|_: &SearchUpdate<'_, T>| MoveVerdict::Accept)),
        ));

        if !triggers.search.trim().is_empty() {
            let mut options = HotkeyOptions::new().description("<search>Search items");
            options.capture_handler = live;
            let capture = triggers.capture_trigger();
            let registration = binding(&results, &on_update, SearchStep::Query, capture);
            engine.register(context, registration.options(options))?;
        }

        let steps = [
            (&triggers.next, SearchStep::Next, "<search>Next match"),
            (&triggers.previous, SearchStep::Previous, "<search>Previous match"),
        ];
        for (trigger, step, description) in steps {
            if trigger.trim().is_empty() {
                continue;
            }
            let registration = binding(&results, &on_update, step, trigger.clone())
                .options(HotkeyOptions::new().description(description).can_repeat(true));
            engine.register(context, registration)?;
        }

        Ok(())
    }
}

fn binding<T: 'static>(
    results: &Rc<RefCell<SearchResults<T>>>,
    on_update: &UpdateCallback<T>,
    step: SearchStep,
    trigger: String,
) -> HotkeyRegistration {
    let results = Rc::clone(results);
    let on_update = Rc::clone(on_update);
    HotkeyRegistration::new([trigger], move |invocation| {
        let query = invocation.matched().captured.clone();
        apply(&results, &on_update, step, query.as_deref());
        Ok(Dispatch::Done)
    })
}

fn apply<T>(
    results: &Rc<RefCell<SearchResults<T>>>,
    on_update: &UpdateCallback<T>,
    step: SearchStep,
    captured: Option<&str>,
) {
    let mut results = results.borrow_mut();
    let prior_query = results.query().to_string();
    let prior_position = results.position();

    match step {
        SearchStep::Query => {
            results.search(captured.unwrap_or_default());
        }
        SearchStep::Next => {
            results.next_match();
        }
        SearchStep::Previous => {
            results.previous_match();
        }
    }

    let (Some(index), Some(pool_index)) = (results.position(), results.current_index()) else {
        return;
    };
    let update = SearchUpdate {
        item: &results.pool()[pool_index],
        index,
        pool_index,
        total: results.len(),
        query: results.query(),
    };
    let verdict = (on_update.borrow_mut())(&update);

    if verdict == MoveVerdict::Reject {
        tracing::debug!(?step, query = %update.query, "Search move rejected");
        match step {
            SearchStep::Query if prior_query.is_empty() => results.clear(),
            SearchStep::Query => {
                results.search(&prior_query);
            }
            SearchStep::Next | SearchStep::Previous => {}
        }
        if let Some(position) = prior_position {
            results.set_position(position);
        }
    }
}
