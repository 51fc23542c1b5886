//! Marker types.

/// Marker type describing an account registration.
#[derive(Clone, Copy, Debug)]
pub struct Registration;

/// Marker type describing an email address validation.
#[derive(Clone, Copy, Debug)]
pub struct Validation;

/// Marker type describing a successful login.
#[derive(Clone, Copy, Debug)]
pub struct Login;
