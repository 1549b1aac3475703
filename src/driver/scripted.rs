//! Scripted in-memory session for unit tests
//!
//! Elements are plain records; locators map verbatim selector strings to
//! handles. Staleness and click interception are scripted per element.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::{Point, Result, Selector, ShopError};
use crate::driver::traits::{BrowserSession, SCROLL_INTO_VIEW};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

/// A scripted element
#[derive(Debug, Clone)]
pub struct FakeElement {
    text: String,
    value: String,
    displayed: bool,
    enabled: bool,
    location: Point,
    stale_reads: u32,
    intercepts: u32,
    typed_as: Option<String>,
    click_error: Option<String>,
    shown_on_scroll: bool,
}

impl FakeElement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: String::new(),
            displayed: true,
            enabled: true,
            location: Point::default(),
            stale_reads: 0,
            intercepts: 0,
            typed_as: None,
            click_error: None,
            shown_on_scroll: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.location = Point { x, y };
        self
    }

    /// The next `n` text reads fail as stale
    pub fn stale_for(mut self, n: u32) -> Self {
        self.stale_reads = n;
        self
    }

    /// The next `n` click attempts of any kind are intercepted
    pub fn intercepted(mut self, n: u32) -> Self {
        self.intercepts = n;
        self
    }

    /// Typing into the element leaves `value` instead of the typed text
    pub fn rewrites_value(mut self, value: impl Into<String>) -> Self {
        self.typed_as = Some(value.into());
        self
    }

    /// Hidden until scrolled into view
    pub fn shown_on_scroll(mut self) -> Self {
        self.displayed = false;
        self.shown_on_scroll = true;
        self
    }

    /// Every click attempt fails with a driver error carrying `message`
    pub fn click_error(mut self, message: impl Into<String>) -> Self {
        self.click_error = Some(message.into());
        self
    }
}

/// Everything the scenarios asked the browser to do
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Goto(String),
    Maximize,
    Scroll(Handle),
    Script(String),
    Click(Handle),
    PointerClick(Handle),
    Clear(Handle),
    SendKeys(Handle, String),
    CloseWindow,
    Quit,
}

#[derive(Default)]
struct State {
    elements: Vec<FakeElement>,
    locators: HashMap<String, Vec<Handle>>,
    children: HashMap<(Handle, String), Handle>,
    calls: Vec<Call>,
    loading_polls: u32,
}

#[derive(Default)]
pub struct ScriptedSession {
    state: Mutex<State>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, element: FakeElement) -> Handle {
        let mut state = self.state.lock().unwrap();
        state.elements.push(element);
        Handle(state.elements.len() - 1)
    }

    /// Make `handles` the matches for `selector`, in order
    pub fn place(&self, selector: &Selector, handles: &[Handle]) {
        self.state
            .lock()
            .unwrap()
            .locators
            .insert(selector.to_string(), handles.to_vec());
    }

    /// Add an element and make it the only match for `selector`
    pub fn put(&self, selector: &Selector, element: FakeElement) -> Handle {
        let handle = self.add(element);
        self.place(selector, &[handle]);
        handle
    }

    /// Make `child` the match for `selector` looked up from `parent`
    pub fn nest(&self, parent: Handle, selector: &Selector, child: FakeElement) -> Handle {
        let handle = self.add(child);
        self.state
            .lock()
            .unwrap()
            .children
            .insert((parent, selector.to_string()), handle);
        handle
    }

    /// `document.readyState` reports loading for the next `n` polls
    pub fn loading_for(&self, n: u32) {
        self.state.lock().unwrap().loading_polls = n;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn value_of(&self, handle: Handle) -> String {
        self.state.lock().unwrap().elements[handle.0].value.clone()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn attempt_click(&self, handle: Handle, call: Call) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        let element = &mut state.elements[handle.0];
        if let Some(message) = &element.click_error {
            return Err(ShopError::driver(message.clone()));
        }
        if element.intercepts > 0 {
            element.intercepts -= 1;
            return Err(ShopError::ClickIntercepted(
                "other element would receive the click".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    type Element = Handle;

    async fn goto(&self, url: &str) -> Result<()> {
        self.record(Call::Goto(url.to_string()));
        Ok(())
    }

    async fn maximize(&self) -> Result<()> {
        self.record(Call::Maximize);
        Ok(())
    }

    async fn ready_state(&self) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        if state.loading_polls > 0 {
            state.loading_polls -= 1;
            return Ok("loading".to_string());
        }
        Ok("complete".to_string())
    }

    async fn find(&self, selector: &Selector) -> Result<Handle> {
        self.state
            .lock()
            .unwrap()
            .locators
            .get(selector.as_str())
            .and_then(|handles| handles.first().copied())
            .ok_or_else(|| ShopError::NoSuchElement(selector.to_string()))
    }

    async fn find_all(&self, selector: &Selector) -> Result<Vec<Handle>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .locators
            .get(selector.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn find_in(&self, parent: &Handle, selector: &Selector) -> Result<Handle> {
        self.state
            .lock()
            .unwrap()
            .children
            .get(&(*parent, selector.to_string()))
            .copied()
            .ok_or_else(|| ShopError::NoSuchElement(selector.to_string()))
    }

    async fn text(&self, element: &Handle) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        let element = &mut state.elements[element.0];
        if element.stale_reads > 0 {
            element.stale_reads -= 1;
            return Err(ShopError::StaleElement("element is not attached".to_string()));
        }
        Ok(element.text.clone())
    }

    async fn attribute(&self, element: &Handle, name: &str) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        Ok((name == "value").then(|| state.elements[element.0].value.clone()))
    }

    async fn is_displayed(&self, element: &Handle) -> Result<bool> {
        Ok(self.state.lock().unwrap().elements[element.0].displayed)
    }

    async fn is_enabled(&self, element: &Handle) -> Result<bool> {
        Ok(self.state.lock().unwrap().elements[element.0].enabled)
    }

    async fn location(&self, element: &Handle) -> Result<Point> {
        Ok(self.state.lock().unwrap().elements[element.0].location)
    }

    async fn execute(&self, script: &str, element: &Handle) -> Result<()> {
        if script == SCROLL_INTO_VIEW {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call::Scroll(*element));
            let element = &mut state.elements[element.0];
            if element.shown_on_scroll {
                element.displayed = true;
            }
        } else {
            self.record(Call::Script(script.to_string()));
        }
        Ok(())
    }

    async fn click(&self, element: &Handle) -> Result<()> {
        self.attempt_click(*element, Call::Click(*element))
    }

    async fn pointer_click(&self, element: &Handle) -> Result<()> {
        self.attempt_click(*element, Call::PointerClick(*element))
    }

    async fn clear(&self, element: &Handle) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Clear(*element));
        state.elements[element.0].value.clear();
        Ok(())
    }

    async fn send_keys(&self, element: &Handle, text: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::SendKeys(*element, text.to_string()));
        let element = &mut state.elements[element.0];
        match &element.typed_as {
            Some(rewritten) => element.value = rewritten.clone(),
            None => element.value.push_str(text),
        }
        Ok(())
    }

    async fn close_window(&self) -> Result<()> {
        self.record(Call::CloseWindow);
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        self.record(Call::Quit);
        Ok(())
    }
}
