use url::Url;

use crate::formats::Record;

pub const FRAME_SANDBOX: &str = "allow-same-origin allow-scripts allow-popups allow-forms";
pub const EXTERNAL_WINDOW_FEATURES: &str = "noopener,noreferrer";

/// What "read now" opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadAction {
    Video { video_id: String },
    Frame { url: String, sandbox: &'static str },
}

/// What "download" opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAction {
    pub url: String,
    pub target: &'static str,
    pub features: &'static str,
}

pub struct DetailPresenter<'a> {
    record: &'a Record,
    is_favorite: bool,
}

impl<'a> DetailPresenter<'a> {
    pub fn new(record: &'a Record, is_favorite: bool) -> Self {
        Self {
            record,
            is_favorite,
        }
    }

    pub fn record(&self) -> &Record {
        self.record
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    /// Argument for the favorite toggle: the inverse of the current state.
    pub fn favorite_toggle(&self) -> (u64, bool) {
        (self.record.id, !self.is_favorite)
    }

    /// `None` when there is nothing to open.
    pub fn read_now(&self) -> Option<ReadAction> {
        let link = self.record.read_link.as_deref()?;
        if is_youtube_url(link) {
            let video_id = extract_youtube_id(link)?;
            return Some(ReadAction::Video { video_id });
        }
        Some(ReadAction::Frame {
            url: link.to_owned(),
            sandbox: FRAME_SANDBOX,
        })
    }

    pub fn download(&self) -> Option<DownloadAction> {
        let link = self.record.download_link.as_deref()?;
        Some(DownloadAction {
            url: link.to_owned(),
            target: "_blank",
            features: EXTERNAL_WINDOW_FEATURES,
        })
    }

    pub fn render(&self) -> String {
        let record = self.record;
        let mut out = String::new();
        let heart = if self.is_favorite { " ♥" } else { "" };
        out.push_str(&format!("{}{heart}\npor {}\n", record.title, record.author));
        if !record.description.is_empty() {
            out.push_str(&format!("\nSobre o Livro\n{}\n", record.description));
        }
        if let Some(benefits) = &record.benefits {
            out.push_str(&format!("\nBenefícios da Leitura\n{benefits}\n"));
        }
        out.push_str(&format!(
            "\nAutor: {}\nLeitura Online: {}\nDownload: {}\n",
            record.author,
            availability(record.has_read_link()),
            availability(record.has_download()),
        ));
        out
    }
}

fn availability(available: bool) -> &'static str {
    if available { "Disponível" } else { "Indisponível" }
}

pub fn is_youtube_url(link: &str) -> bool {
    let Ok(url) = Url::parse(link) else {
        return false;
    };
    matches!(
        url.host_str(),
        Some("youtube.com" | "www.youtube.com" | "m.youtube.com" | "youtu.be" | "www.youtu.be")
    )
}

pub fn extract_youtube_id(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let host = url.host_str()?;
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let candidate = if host.ends_with("youtu.be") {
        segments.next()?.to_owned()
    } else {
        match segments.next()? {
            "watch" => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())?,
            "embed" | "shorts" | "v" | "live" => segments.next()?.to_owned(),
            _ => return None,
        }
    };

    is_video_id(&candidate).then_some(candidate)
}

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == 11
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
