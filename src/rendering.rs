//! Render mode switches for the server renderer.

use serde::{Deserialize, Serialize};

use crate::store::{Action, DuckState, Reducer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderTextOnlyOptions {
    /// Replacement for stripped HTML tags.
    pub html_tag_replacement: String,
    /// Tags kept in text-only output.
    pub allowed_html_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderingState {
    pub disable_styles: bool,
    pub disable_scripts: bool,
    pub render_partial_only: bool,
    pub render_text_only: bool,
    pub render_text_only_options: RenderTextOnlyOptions,
}

impl DuckState for RenderingState {}

#[derive(Debug, Clone)]
pub enum RenderingAction {
    SetDangerouslyDisableScripts(bool),
    SetDangerouslyDisableScriptsAndStyles(bool),
    SetRenderPartialOnly(bool),
    SetRenderTextOnly {
        render_text_only: bool,
        options: RenderTextOnlyOptions,
    },
}

impl Action for RenderingAction {
    fn type_name(&self) -> &'static str {
        match self {
            RenderingAction::SetDangerouslyDisableScripts(_) => {
                "app-ducks/render/SET_DANGEROUSLY_DISABLE_SCRIPTS"
            }
            RenderingAction::SetDangerouslyDisableScriptsAndStyles(_) => {
                "app-ducks/render/SET_DANGEROUSLY_DISABLE_SCRIPTS_AND_STYLES"
            }
            RenderingAction::SetRenderPartialOnly(_) => "app-ducks/render/SET_RENDER_PARTIAL_ONLY",
            RenderingAction::SetRenderTextOnly { .. } => "app-ducks/render/SET_RENDER_TEXT_ONLY",
        }
    }
}

pub struct RenderingReducer;

impl Reducer for RenderingReducer {
    type State = RenderingState;
    type Action = RenderingAction;

    fn reduce(mut state: Self::State, action: Self::Action) -> Self::State {
        match action {
            RenderingAction::SetDangerouslyDisableScripts(disable) => state.disable_scripts = disable,
            RenderingAction::SetDangerouslyDisableScriptsAndStyles(disable) => {
                state.disable_styles = disable;
                state.disable_scripts = disable;
            }
            RenderingAction::SetRenderPartialOnly(partial) => state.render_partial_only = partial,
            RenderingAction::SetRenderTextOnly {
                render_text_only,
                options,
            } => {
                state.render_text_only = render_text_only;
                state.render_text_only_options = options;
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disable_scripts_and_styles_sets_both() {
        let state = RenderingReducer::reduce(
            RenderingState::default(),
            RenderingAction::SetDangerouslyDisableScriptsAndStyles(true),
        );
        assert!(state.disable_scripts);
        assert!(state.disable_styles);

        let state = RenderingReducer::reduce(state, RenderingAction::SetDangerouslyDisableScripts(false));
        assert!(!state.disable_scripts);
        assert!(state.disable_styles);
    }

    #[test]
    fn test_text_only_replaces_options() {
        let state = RenderingReducer::reduce(
            RenderingState::default(),
            RenderingAction::SetRenderTextOnly {
                render_text_only: true,
                options: RenderTextOnlyOptions {
                    html_tag_replacement: "\n".to_string(),
                    allowed_html_tags: vec!["a".to_string()],
                },
            },
        );
        assert!(state.render_text_only);
        assert_eq!(state.render_text_only_options.html_tag_replacement, "\n");

        let state = RenderingReducer::reduce(
            state,
            RenderingAction::SetRenderTextOnly {
                render_text_only: false,
                options: RenderTextOnlyOptions::default(),
            },
        );
        assert!(state.render_text_only_options.allowed_html_tags.is_empty());
    }

    #[test]
    fn test_partial_only() {
        let state = RenderingReducer::reduce(RenderingState::default(), RenderingAction::SetRenderPartialOnly(true));
        assert!(state.render_partial_only);
    }
}
