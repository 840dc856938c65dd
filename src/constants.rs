/// Prefix shared by every action type dispatched by this crate.
pub const ACTIONS_PREFIX: &str = "@@reduxFirestore";

/// Redux action types, mirroring the `actionTypes` export of the original
/// JS library so existing reducers keep working unchanged.
pub mod action_types {
    pub const SET_LISTENER: &str = "@@reduxFirestore/SET_LISTENER";
    pub const UNSET_LISTENER: &str = "@@reduxFirestore/UNSET_LISTENER";
    pub const LISTENER_RESPONSE: &str = "@@reduxFirestore/LISTENER_RESPONSE";
    pub const LISTENER_ERROR: &str = "@@reduxFirestore/LISTENER_ERROR";

    pub const GET_REQUEST: &str = "@@reduxFirestore/GET_REQUEST";
    pub const GET_SUCCESS: &str = "@@reduxFirestore/GET_SUCCESS";
    pub const GET_FAILURE: &str = "@@reduxFirestore/GET_FAILURE";

    pub const ADD_REQUEST: &str = "@@reduxFirestore/ADD_REQUEST";
    pub const ADD_SUCCESS: &str = "@@reduxFirestore/ADD_SUCCESS";
    pub const ADD_FAILURE: &str = "@@reduxFirestore/ADD_FAILURE";

    pub const SET_REQUEST: &str = "@@reduxFirestore/SET_REQUEST";
    pub const SET_SUCCESS: &str = "@@reduxFirestore/SET_SUCCESS";
    pub const SET_FAILURE: &str = "@@reduxFirestore/SET_FAILURE";

    pub const UPDATE_REQUEST: &str = "@@reduxFirestore/UPDATE_REQUEST";
    pub const UPDATE_SUCCESS: &str = "@@reduxFirestore/UPDATE_SUCCESS";
    pub const UPDATE_FAILURE: &str = "@@reduxFirestore/UPDATE_FAILURE";

    pub const DELETE_REQUEST: &str = "@@reduxFirestore/DELETE_REQUEST";
    pub const DELETE_SUCCESS: &str = "@@reduxFirestore/DELETE_SUCCESS";
    pub const DELETE_FAILURE: &str = "@@reduxFirestore/DELETE_FAILURE";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_types_carry_prefix() {
        assert!(action_types::SET_LISTENER.starts_with(ACTIONS_PREFIX));
        assert!(action_types::LISTENER_RESPONSE.starts_with(ACTIONS_PREFIX));
        assert!(action_types::DELETE_FAILURE.starts_with(ACTIONS_PREFIX));
    }
}
