//! Gold prices from the Altinkaynak SOAP data service.

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::time::Duration;
use tracing::{debug, instrument};

use super::util::{http_client, parse_decimal};
use crate::core::config::AltinkaynakProviderConfig;
use crate::core::error::ProviderError;
use crate::core::reconcile::reconcile;
use crate::core::{Quote, QuoteSource, RawInstrumentRecord};

const SERVICE_PATH: &str = "/DataService.asmx";
const SOAP_ACTION: &str = "http://data.altinkaynak.com/GetGold";
const RESULT_NODE: &str = "GetGoldResult";

/// Provider code -> (canonical code, display name). `E` prefixed codes are old mint
/// variants of the instrument without the prefix.
static GOLD_CODES: &[(&str, &str, &str)] = &[
    ("HH_T", "HAS", "Has Altın"),
    ("CH_T", "KULCE", "Külçe Altın"),
    ("GA", "GA", "Gram Altın"),
    ("GAT", "GAT", "Gram Altın (Toptan)"),
    ("B", "B22", "22 Ayar Bilezik"),
    ("18", "A18", "18 Ayar Altın"),
    ("14", "A14", "14 Ayar Altın"),
    ("C", "C", "Çeyrek Altın"),
    ("EC", "C", "Çeyrek Altın"),
    ("Y", "Y", "Yarım Altın"),
    ("EY", "Y", "Yarım Altın"),
    ("T", "T", "Tam Altın"),
    ("ET", "T", "Tam Altın"),
    ("A", "ATA", "Ata Cumhuriyet"),
    ("A5", "ATA5", "Ata Beşli"),
    ("R", "RESAT", "Reşat Altın"),
    ("H", "HAMIT", "Hamit Altın"),
    ("G", "G", "Gremse Altın"),
    ("EG", "G", "Gremse Altın"),
];

fn lookup_code(provider_code: &str) -> Option<(&'static str, &'static str)> {
    GOLD_CODES
        .iter()
        .find(|(code, _, _)| *code == provider_code)
        .map(|&(_, mapped, name)| (mapped, name))
}

/// Decodes the five predefined XML entities. `&amp;` goes last so that
/// `&amp;lt;` becomes `&lt;` rather than `<`.
pub fn unescape_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn soap_envelope(username: &str, password: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Header>
    <AuthHeader xmlns="http://data.altinkaynak.com/">
      <Username>{username}</Username>
      <Password>{password}</Password>
    </AuthHeader>
  </soap:Header>
  <soap:Body>
    <GetGold xmlns="http://data.altinkaynak.com/" />
  </soap:Body>
</soap:Envelope>"#
    )
}

/// Pulls the escaped rate document out of the SOAP envelope.
fn extract_result_payload(envelope: &str) -> Result<String, ProviderError> {
    let mut reader = Reader::from_str(envelope);
    reader.config_mut().trim_text(true);

    let mut in_result = false;
    let mut payload: Option<String> = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == RESULT_NODE.as_bytes() => {
                in_result = true;
                if payload.is_none() {
                    payload = Some(String::new());
                }
            }
            Event::End(e) if e.local_name().as_ref() == RESULT_NODE.as_bytes() => {
                in_result = false;
            }
            Event::Text(t) if in_result => {
                if let Some(buffer) = payload.as_mut() {
                    buffer.push_str(&unescape_entities(&String::from_utf8_lossy(&t)));
                }
            }
            Event::CData(c) if in_result => {
                if let Some(buffer) = payload.as_mut() {
                    buffer.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    payload
        .filter(|p| !p.trim().is_empty())
        .ok_or(ProviderError::MissingNode(RESULT_NODE))
}

#[derive(Default)]
struct KurFields {
    code: Option<String>,
    bid: Option<String>,
    ask: Option<String>,
}

/// Parses the inner `<Kurlar><Kur>..</Kur></Kurlar>` document into mapped records.
pub(crate) fn parse_rates(document: &str) -> Result<Vec<RawInstrumentRecord>, ProviderError> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut current: Option<KurFields> = None;
    let mut field: Vec<u8> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                if name.as_ref() == b"Kur" {
                    current = Some(KurFields::default());
                } else {
                    field = name.as_ref().to_vec();
                }
            }
            Event::Text(t) => {
                if let Some(kur) = current.as_mut() {
                    let value = unescape_entities(&String::from_utf8_lossy(&t));
                    match field.as_slice() {
                        b"Kod" => kur.code = Some(value),
                        b"Alis" => kur.bid = Some(value),
                        b"Satis" => kur.ask = Some(value),
                        _ => {}
                    }
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"Kur"
                    && let Some(kur) = current.take()
                {
                    records.extend(map_record(kur));
                }
                field.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(records)
}

fn map_record(kur: KurFields) -> Option<RawInstrumentRecord> {
    let provider_code = kur.code?.trim().to_string();
    let Some((mapped_code, display_name)) = lookup_code(&provider_code) else {
        debug!(code = %provider_code, "Skipping unmapped gold code");
        return None;
    };

    Some(RawInstrumentRecord {
        provider_code,
        mapped_code: mapped_code.to_string(),
        display_name: display_name.to_string(),
        bid: kur.bid.as_deref().and_then(parse_decimal).unwrap_or(0.0),
        ask: kur.ask.as_deref().and_then(parse_decimal).unwrap_or(0.0),
    })
}

pub struct AltinkaynakProvider {
    endpoint: String,
    envelope: String,
    client: reqwest::Client,
    ttl: Duration,
}

impl AltinkaynakProvider {
    pub fn new(config: &AltinkaynakProviderConfig) -> reqwest::Result<Self> {
        Ok(Self {
            endpoint: format!("{}{}", config.base_url.trim_end_matches('/'), SERVICE_PATH),
            envelope: soap_envelope(&config.username, &config.password),
            client: http_client(config.timeout())?,
            ttl: config.ttl(),
        })
    }

    async fn request_records(&self) -> Result<Vec<RawInstrumentRecord>, ProviderError> {
        debug!("Requesting gold rates from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{SOAP_ACTION}\""))
            .body(self.envelope.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::UpstreamStatus {
                status: response.status(),
            });
        }

        let body = response.text().await?;
        let document = extract_result_payload(&body)?;
        parse_rates(&document)
    }

    /// Mapped but unreconciled records; empty on any failure.
    #[instrument(name = "AltinkaynakFetch", skip(self))]
    pub async fn fetch_records(&self) -> Vec<RawInstrumentRecord> {
        match self.request_records().await {
            Ok(records) => {
                debug!(count = records.len(), "Received gold records");
                records
            }
            Err(e) => {
                e.report(self.name());
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl QuoteSource for AltinkaynakProvider {
    fn name(&self) -> &'static str {
        "altinkaynak"
    }

    fn freshness(&self) -> Duration {
        self.ttl
    }

    async fn fetch_quotes(&self) -> Vec<Quote> {
        reconcile(self.fetch_records().await)
    }
}
