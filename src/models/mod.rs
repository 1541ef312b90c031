pub mod radio;
pub mod track;
pub mod user;

pub use radio::{
    ActionOutcome, ActionStatus, CreateRadioRequest, PlayerAction, PlayerSnapshot, PlayerStatus,
    Radio, RadioAction, UpdateData, UpdateSections,
};
pub use track::{CreateTrackRequest, PlaylistEntry, Track, Veto};
pub use user::{AuthResponse, CreateUserRequest, LoginRequest, User, UserInfo, UserRole};
