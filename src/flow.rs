//! State machine for one analysis cycle on the analysis page.
//!
//! The reducer is pure: [`AnalysisFlow::handle`] updates the state and
//! returns the side effects the page has to run (permission prompt, picker,
//! upload, alert). Effects report back by sending another [`FlowEvent`].

pub const PERMISSION_TITLE: &str = "Permission Required";
pub const FAILURE_TITLE: &str = "Analysis Failed";

/// Where the image comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Gallery,
    Camera,
}

impl ImageSource {
    pub fn permission_message(self) -> &'static str {
        match self {
            ImageSource::Gallery => {
                "The app needs permission to access your photo library to analyze images."
            }
            ImageSource::Camera => "The app needs permission to access your camera to take photos.",
        }
    }
}

/// An image chosen by the user, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedImage {
    pub file_name: String,
    pub mime_type: String,
    pub base64: String,
}

impl PickedImage {
    /// `data:` URL used for the on-screen preview.
    pub fn preview_url(&self) -> String {
        let mime = if self.mime_type.is_empty() {
            "image/jpeg"
        } else {
            self.mime_type.as_str()
        };
        format!("data:{};base64,{}", mime, self.base64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState<R> {
    Idle,
    AwaitingPermission(ImageSource),
    Picking(ImageSource),
    Loading { attempt: u64, image: PickedImage },
    ResultShown { image: PickedImage, report: R },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent<R> {
    Start(ImageSource),
    PermissionResolved { granted: bool },
    /// `None` when the picker was dismissed without a selection.
    Picked(Option<PickedImage>),
    AnalysisFinished { attempt: u64, outcome: Result<R, String> },
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RequestPermission(ImageSource),
    OpenPicker(ImageSource),
    Analyze { attempt: u64, image: PickedImage },
    Notify { title: String, message: String },
}

#[derive(Debug, Clone)]
pub struct AnalysisFlow<R> {
    state: FlowState<R>,
    attempt: u64,
}

impl<R> Default for AnalysisFlow<R> {
    fn default() -> Self {
        Self {
            state: FlowState::Idle,
            attempt: 0,
        }
    }
}

impl<R> AnalysisFlow<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FlowState<R> {
        &self.state
    }

    /// Entry buttons are only offered when nothing is in progress.
    pub fn accepts_start(&self) -> bool {
        matches!(self.state, FlowState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FlowState::Loading { .. })
    }

    pub fn image(&self) -> Option<&PickedImage> {
        match &self.state {
            FlowState::Loading { image, .. } | FlowState::ResultShown { image, .. } => Some(image),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&R> {
        match &self.state {
            FlowState::ResultShown { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Apply `event` and return the effects to run. Events that do not fit
    /// the current state are ignored.
    pub fn handle(&mut self, event: FlowEvent<R>) -> Vec<Effect> {
        let state = std::mem::replace(&mut self.state, FlowState::Idle);

        let (next, effects) = match (state, event) {
            (FlowState::Idle, FlowEvent::Start(source)) => (
                FlowState::AwaitingPermission(source),
                vec![Effect::RequestPermission(source)],
            ),

            (FlowState::AwaitingPermission(source), FlowEvent::PermissionResolved { granted }) => {
                if granted {
                    (FlowState::Picking(source), vec![Effect::OpenPicker(source)])
                } else {
                    (
                        FlowState::Idle,
                        vec![notify(PERMISSION_TITLE, source.permission_message())],
                    )
                }
            }

            (FlowState::Picking(_), FlowEvent::Picked(Some(image))) => {
                self.attempt += 1;
                let attempt = self.attempt;
                (
                    FlowState::Loading {
                        attempt,
                        image: image.clone(),
                    },
                    vec![Effect::Analyze { attempt, image }],
                )
            }

            (FlowState::Picking(_), FlowEvent::Picked(None)) => (FlowState::Idle, vec![]),

            (FlowState::Loading { attempt, image }, FlowEvent::AnalysisFinished { attempt: done, outcome })
                if attempt == done =>
            {
                match outcome {
                    Ok(report) => (FlowState::ResultShown { image, report }, vec![]),
                    Err(message) => (FlowState::Idle, vec![notify(FAILURE_TITLE, &failure_message(&message))]),
                }
            }

            (FlowState::ResultShown { .. }, FlowEvent::Reset) => (FlowState::Idle, vec![]),

            (state, _) => (state, vec![]),
        };

        self.state = next;
        effects
    }
}

/// Body of the blocking alert shown when an analysis fails.
pub fn failure_message(error: &str) -> String {
    let error = if error.trim().is_empty() {
        "Unknown error occurred"
    } else {
        error
    };
    format!(
        "Error: {}\n\nMake sure the backend server is running and accessible.",
        error
    )
}

fn notify(title: &str, message: &str) -> Effect {
    Effect::Notify {
        title: title.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Flow = AnalysisFlow<&'static str>;

    fn image(name: &str) -> PickedImage {
        PickedImage {
            file_name: name.to_string(),
            mime_type: "image/jpeg".to_string(),
            base64: "AQID".to_string(),
        }
    }

    /// Drive a flow from Idle to Loading and return the attempt number.
    fn start_loading(flow: &mut Flow, source: ImageSource, name: &str) -> u64 {
        flow.handle(FlowEvent::Start(source));
        flow.handle(FlowEvent::PermissionResolved { granted: true });
        match flow.handle(FlowEvent::Picked(Some(image(name)))).as_slice() {
            [Effect::Analyze { attempt, .. }] => *attempt,
            other => panic!("Expected a single Analyze effect, got {:?}", other),
        }
    }

    #[test]
    fn test_happy_path() {
        let mut flow = Flow::new();

        assert_eq!(
            flow.handle(FlowEvent::Start(ImageSource::Gallery)),
            vec![Effect::RequestPermission(ImageSource::Gallery)]
        );
        assert_eq!(
            flow.handle(FlowEvent::PermissionResolved { granted: true }),
            vec![Effect::OpenPicker(ImageSource::Gallery)]
        );
        let effects = flow.handle(FlowEvent::Picked(Some(image("strip.jpg"))));
        assert_eq!(
            effects,
            vec![Effect::Analyze {
                attempt: 1,
                image: image("strip.jpg")
            }]
        );
        assert!(flow.is_loading());
        assert_eq!(flow.image().unwrap().file_name, "strip.jpg");

        let effects = flow.handle(FlowEvent::AnalysisFinished {
            attempt: 1,
            outcome: Ok("report"),
        });
        assert!(effects.is_empty());
        assert_eq!(flow.report(), Some(&"report"));
    }

    #[test]
    fn test_permission_denied_notifies_once_and_never_opens_picker() {
        let mut flow = Flow::new();
        flow.handle(FlowEvent::Start(ImageSource::Camera));
        let effects = flow.handle(FlowEvent::PermissionResolved { granted: false });

        assert_eq!(
            effects,
            vec![Effect::Notify {
                title: "Permission Required".to_string(),
                message: "The app needs permission to access your camera to take photos.".to_string(),
            }]
        );
        assert!(!effects.iter().any(|e| matches!(e, Effect::OpenPicker(_))));
        assert_eq!(flow.state(), &FlowState::Idle);

        // A duplicate resolution is ignored
        assert!(flow.handle(FlowEvent::PermissionResolved { granted: false }).is_empty());
    }

    #[test]
    fn test_picker_cancel_is_silent() {
        let mut flow = Flow::new();
        flow.handle(FlowEvent::Start(ImageSource::Gallery));
        flow.handle(FlowEvent::PermissionResolved { granted: true });

        assert!(flow.handle(FlowEvent::Picked(None)).is_empty());
        assert_eq!(flow.state(), &FlowState::Idle);
        assert!(flow.image().is_none());
    }

    #[test]
    fn test_failure_clears_image_and_notifies() {
        let mut flow = Flow::new();
        let attempt = start_loading(&mut flow, ImageSource::Gallery, "a.jpg");

        let effects = flow.handle(FlowEvent::AnalysisFinished {
            attempt,
            outcome: Err("Could not reach the analysis server".to_string()),
        });
        assert_eq!(
            effects,
            vec![Effect::Notify {
                title: "Analysis Failed".to_string(),
                message: "Error: Could not reach the analysis server\n\nMake sure the backend server is running and accessible."
                    .to_string(),
            }]
        );
        assert_eq!(flow.state(), &FlowState::Idle);
        assert!(flow.image().is_none());
    }

    #[test]
    fn test_failure_then_success_shows_only_second_result() {
        let mut flow = Flow::new();
        let first = start_loading(&mut flow, ImageSource::Gallery, "a.jpg");
        flow.handle(FlowEvent::AnalysisFinished {
            attempt: first,
            outcome: Err("boom".to_string()),
        });

        let second = start_loading(&mut flow, ImageSource::Camera, "b.jpg");
        assert_ne!(first, second);
        flow.handle(FlowEvent::AnalysisFinished {
            attempt: second,
            outcome: Ok("second"),
        });

        match flow.state() {
            FlowState::ResultShown { image, report } => {
                assert_eq!(image.file_name, "b.jpg");
                assert_eq!(*report, "second");
            }
            other => panic!("Expected ResultShown, got {:?}", other),
        }
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut flow = Flow::new();
        let attempt = start_loading(&mut flow, ImageSource::Gallery, "a.jpg");

        let effects = flow.handle(FlowEvent::AnalysisFinished {
            attempt: attempt + 7,
            outcome: Err("late".to_string()),
        });
        assert!(effects.is_empty());
        assert!(flow.is_loading());

        flow.handle(FlowEvent::AnalysisFinished {
            attempt,
            outcome: Ok("current"),
        });
        assert_eq!(flow.report(), Some(&"current"));

        // A late completion after the result is shown changes nothing
        flow.handle(FlowEvent::AnalysisFinished {
            attempt,
            outcome: Ok("late"),
        });
        assert_eq!(flow.report(), Some(&"current"));
    }

    #[test]
    fn test_start_ignored_while_busy() {
        let mut flow = Flow::new();
        start_loading(&mut flow, ImageSource::Gallery, "a.jpg");
        assert!(!flow.accepts_start());
        assert!(flow.handle(FlowEvent::Start(ImageSource::Camera)).is_empty());
        assert!(flow.is_loading());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut flow = Flow::new();
        let attempt = start_loading(&mut flow, ImageSource::Gallery, "a.jpg");
        flow.handle(FlowEvent::AnalysisFinished {
            attempt,
            outcome: Ok("done"),
        });

        assert!(flow.handle(FlowEvent::Reset).is_empty());
        assert_eq!(flow.state(), &FlowState::Idle);
        assert!(flow.accepts_start());
    }

    #[test]
    fn test_reset_ignored_while_loading() {
        let mut flow = Flow::new();
        start_loading(&mut flow, ImageSource::Gallery, "a.jpg");
        flow.handle(FlowEvent::Reset);
        assert!(flow.is_loading());
    }

    #[test]
    fn test_failure_message_fallback() {
        assert!(failure_message("").starts_with("Error: Unknown error occurred"));
    }

    #[test]
    fn test_preview_url_defaults_mime() {
        let mut img = image("x");
        img.mime_type.clear();
        assert_eq!(img.preview_url(), "data:image/jpeg;base64,AQID");
    }
}
