//! Synthesized audio handed from the text-to-speech collaborator to the
//! messaging platform's attachment upload.

/// An encoded audio clip.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `audio/mpeg`.
    pub mime: String,
    /// File name sent with the multipart upload.
    pub file_name: String,
}

impl AudioClip {
    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: "audio/mpeg".to_string(),
            file_name: "voice.mp3".to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Audio payloads are large; keep them out of logs.
impl std::fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("mime", &self.mime)
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
