//! Dropped paths.
//!
//! Terminals deliver files dragged onto the window as a bracketed paste: a
//! whitespace separated list where each path may be quoted, backslash escaped
//! or written as a `file://` URI.

use std::path::PathBuf;

use tracing::debug;

use crate::config::LibrarySettings;

use super::scan::{is_audio_file, scan};

/// Split pasted text into the paths it names.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_token = true;
                }
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        paths.push(finish_token(&current));
                        current.clear();
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }
    if in_token {
        paths.push(finish_token(&current));
    }

    paths
}

fn finish_token(token: &str) -> PathBuf {
    match token.strip_prefix("file://") {
        Some(rest) => PathBuf::from(percent_decode(rest)),
        None => PathBuf::from(token),
    }
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(v) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(v);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Turn dropped paths into the audio files they stand for.
///
/// Files are kept when their extension is allowed; directories are expanded
/// recursively with the same filter; anything else is skipped.
pub fn expand_dropped(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            if is_audio_file(path, settings) {
                files.push(path.clone());
            } else {
                debug!(path = %path.display(), "dropped file is not audio, skipping");
            }
        } else if path.is_dir() {
            files.extend(scan(path, true, settings));
        } else {
            debug!(path = %path.display(), "dropped path does not exist, skipping");
        }
    }
    files
}
