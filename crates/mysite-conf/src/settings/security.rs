//! TLS termination and proxy header trust.

use serde::{Deserialize, Serialize};

/// Header/value pair that marks a request as having arrived over HTTPS at
/// an upstream proxy.
///
/// The header is stored in its WSGI `META` form (`HTTP_` prefix, upper-case,
/// underscores).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySslHeader {
	pub header: String,
	pub value: String,
}

impl ProxySslHeader {
	/// `X-Forwarded-Proto: https`
	pub fn forwarded_proto_https() -> Self {
		Self {
			header: "HTTP_X_FORWARDED_PROTO".to_string(),
			value: "https".to_string(),
		}
	}

	/// The header as it appears on the wire, e.g. `X-Forwarded-Proto`
	///
	/// # Examples
	///
	/// ```
	/// use mysite_conf::settings::security::ProxySslHeader;
	///
	/// let header = ProxySslHeader::forwarded_proto_https();
	/// assert_eq!(header.http_header_name(), "X-Forwarded-Proto");
	/// ```
	pub fn http_header_name(&self) -> String {
		let name = self.header.strip_prefix("HTTP_").unwrap_or(&self.header);
		name.split('_')
			.filter(|part| !part.is_empty())
			.map(|part| {
				let lower = part.to_ascii_lowercase();
				let mut chars = lower.chars();
				match chars.next() {
					Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
					None => String::new(),
				}
			})
			.collect::<Vec<_>>()
			.join("-")
	}

	/// Whether a received header value signals upstream TLS termination.
	///
	/// Only the first entry of a comma-separated value counts, matching
	/// what the proxy closest to the client appended.
	pub fn is_secure(&self, received: Option<&str>) -> bool {
		match received {
			Some(raw) => raw
				.split(',')
				.next()
				.map(|first| first.trim() == self.value)
				.unwrap_or(false),
			None => false,
		}
	}
}
