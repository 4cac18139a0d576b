/// Maximum avatar upload size: 5 MB.
pub const MAX_AVATAR_SIZE_BYTES: usize = 5 * 1024 * 1024;
/// Maximum length for user display names, in characters.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 64;
/// Shortest password the identity backend accepts.
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Object store prefix under which every user's avatar lives.
pub const AVATAR_PREFIX: &str = "profile_photos";
/// Object name of the avatar inside a user's prefix. Re-uploads overwrite it.
pub const AVATAR_OBJECT_NAME: &str = "profile.jpg";
