pub mod session_handler;

pub use session_handler::{
    __path_get_session, __path_login_claimant, __path_login_reviewer, __path_logout,
    __path_register_claimant, __path_register_reviewer, get_session, login_claimant,
    login_reviewer, logout, register_claimant, register_reviewer,
};
