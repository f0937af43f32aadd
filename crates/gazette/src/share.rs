use std::{fmt, str::FromStr};

use urlencoding::encode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    Facebook,
    Twitter,
    Linkedin,
    Whatsapp,
    Email,
}

impl SharePlatform {
    pub const ALL: [SharePlatform; 5] = [
        SharePlatform::Facebook,
        SharePlatform::Twitter,
        SharePlatform::Linkedin,
        SharePlatform::Whatsapp,
        SharePlatform::Email,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SharePlatform::Facebook => "facebook",
            SharePlatform::Twitter => "twitter",
            SharePlatform::Linkedin => "linkedin",
            SharePlatform::Whatsapp => "whatsapp",
            SharePlatform::Email => "email",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SharePlatform::Facebook => "Facebook",
            SharePlatform::Twitter => "Twitter",
            SharePlatform::Linkedin => "LinkedIn",
            SharePlatform::Whatsapp => "WhatsApp",
            SharePlatform::Email => "Email",
        }
    }

    /// Builds the link that shares `url` on this platform. All components are percent-encoded.
    pub fn share_url(&self, url: &str, title: &str, description: &str) -> String {
        let url = encode(url);
        let title = encode(title);

        match self {
            SharePlatform::Facebook => format!("https://www.facebook.com/sharer/sharer.php?u={url}"),
            SharePlatform::Twitter => {
                format!("https://twitter.com/intent/tweet?url={url}&text={title}")
            }
            SharePlatform::Linkedin => {
                format!("https://www.linkedin.com/sharing/share-offsite/?url={url}")
            }
            SharePlatform::Whatsapp => format!("https://wa.me/?text={title}%20{url}"),
            SharePlatform::Email => format!(
                "mailto:?subject={title}&body={}%20{url}",
                encode(description)
            ),
        }
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SharePlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SharePlatform::ALL
            .into_iter()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown share platform `{}`", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://news.example.com/blog/7";

    #[test]
    fn test_share_urls() {
        assert_eq!(
            SharePlatform::Facebook.share_url(URL, "Title", ""),
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fnews.example.com%2Fblog%2F7"
        );
        assert_eq!(
            SharePlatform::Twitter.share_url(URL, "Hello world", ""),
            "https://twitter.com/intent/tweet?url=https%3A%2F%2Fnews.example.com%2Fblog%2F7&text=Hello%20world"
        );
        assert_eq!(
            SharePlatform::Whatsapp.share_url(URL, "Hi", ""),
            "https://wa.me/?text=Hi%20https%3A%2F%2Fnews.example.com%2Fblog%2F7"
        );
        assert_eq!(
            SharePlatform::Email.share_url(URL, "Hi", "A & B"),
            "mailto:?subject=Hi&body=A%20%26%20B%20https%3A%2F%2Fnews.example.com%2Fblog%2F7"
        );
        assert!(
            SharePlatform::Linkedin
                .share_url(URL, "", "")
                .starts_with("https://www.linkedin.com/sharing/share-offsite/?url=https%3A")
        );
    }

    #[test]
    fn test_parse_platform() {
        assert_eq!("Twitter".parse(), Ok(SharePlatform::Twitter));
        assert!("myspace".parse::<SharePlatform>().is_err());
    }
}
