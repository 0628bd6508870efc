use std::path::{Path, PathBuf};

/// Object name encoded in a key-press clip name.
///
/// The name is everything before the first occurrence of `suffix`; a clip
/// name without the suffix maps to itself.
///
/// ```
/// use piano::interaction::derive_object_name;
///
/// assert_eq!(derive_object_name("C4_Press", "_Press"), "C4");
/// assert_eq!(derive_object_name("C#4_Press.001", "_Press"), "C#4");
/// assert_eq!(derive_object_name("Lid", "_Press"), "Lid");
/// ```
#[must_use]
pub fn derive_object_name<'a>(clip_name: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() {
        return clip_name;
    }
    clip_name.split_once(suffix).map_or(clip_name, |(name, _)| name)
}

/// Sample file for the key named `name`: `<sounds_dir>/<name>.wav` with
/// every `#` spelled out as `Sharp`.
///
/// Only the last path component of the name is used, so the result always
/// lies directly inside `sounds_dir`.
///
/// ```
/// use std::path::Path;
/// use piano::interaction::audio_asset_path;
///
/// assert_eq!(audio_asset_path(Path::new("sounds"), "C#4"), Path::new("sounds/CSharp4.wav"));
/// assert_eq!(audio_asset_path(Path::new("sounds"), "/etc/C4"), Path::new("sounds/C4.wav"));
/// ```
#[must_use]
pub fn audio_asset_path(sounds_dir: &Path, name: &str) -> PathBuf {
    let file_name = format!("{}.wav", name.replace('#', "Sharp"));
    match Path::new(&file_name).file_name() {
        Some(base) => sounds_dir.join(base),
        None => sounds_dir.join(&file_name),
    }
}
