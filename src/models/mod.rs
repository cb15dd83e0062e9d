pub mod homework;
pub mod module;
pub mod profile;
pub mod session;
pub mod subject;

pub use homework::{Sheet, Thumbnail, UploadFile, UploadGroup};
pub use module::{Module, ModuleKind};
pub use profile::{
    ClassRecord, Profile, ProfileUpdate, ProfileWithModules, RoleName, SignupRequest,
    TeacherProfile,
};
pub use session::{AuthEvent, AuthUser, Session};
pub use subject::Subject;
