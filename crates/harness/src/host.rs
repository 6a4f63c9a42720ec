use timeline_core::{SeededIdSource, TimelineConfig};
use timeline_engine::{Engine, EngineError, HostInputs, Outcome, Outputs, RequestPayload, TimelineView};

/// A host application driving one control instance through its property bag.
pub struct TestHost {
    pub engine: Engine<SeededIdSource>,
    pub inputs: HostInputs,
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHost {
    pub fn new() -> Self {
        Self::with_config(TimelineConfig::default())
    }

    pub fn with_config(config: TimelineConfig) -> Self {
        Self {
            engine: Engine::with_id_source(config, SeededIdSource::new(0x5eed)),
            inputs: HostInputs {
                comments_json: String::new(),
                site_url: "https://contoso.sharepoint.com/sites/ops".into(),
                record_id: "1001".into(),
                flow_return: None,
                is_loading: false,
            },
        }
    }

    /// Push the current property bag to the control.
    pub fn refresh(&mut self) -> Outcome {
        self.engine.refresh(self.inputs.clone())
    }

    /// Replace the comment collection the host binds and refresh.
    pub fn set_comments(&mut self, comments_json: &str) -> Outcome {
        self.inputs.comments_json = comments_json.to_string();
        self.refresh()
    }

    /// Hand a workflow result back to the control and refresh.
    pub fn deliver(&mut self, flow_return: impl Into<String>) -> Outcome {
        self.inputs.flow_return = Some(flow_return.into());
        self.refresh()
    }

    pub fn clear_flow_return(&mut self) {
        self.inputs.flow_return = None;
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.inputs.is_loading = is_loading;
        self.refresh();
    }

    /// The user submits `text` from the compose box.
    pub fn post(&mut self, text: &str) -> Result<RequestPayload, EngineError> {
        self.engine.post_text(text)
    }

    pub fn outputs(&self) -> Outputs {
        self.engine.outputs()
    }

    pub fn view(&self) -> TimelineView {
        self.engine.view()
    }
}
