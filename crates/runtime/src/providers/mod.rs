//! Adapters for the collaborators the runtime talks to.
//!
//! The traits live in [`crate::api`]; this module holds the implementations
//! and the wire types they exchange.

pub mod animation;
pub mod narrative;
pub mod reward;
pub mod tap;

pub use animation::{AnimationClip, ClipKind, ClipTimings, PlaybackState, TimedAnimationPlayer};
pub use narrative::{
    HttpNarrativeProvider, LineSource, NarrativeError, NarrativeLine, NarrativeRequest,
    NarrativeResult, StaticNarrativeProvider, Tone,
};
pub use reward::RewardChannel;
pub use tap::SeededTapProvider;
