//! services/api/src/adapters/ticket.rs
//!
//! This module contains the ticket issuer adapter, the concrete implementation
//! of the `TicketIssuer` port. Seats are drawn uniformly at random from the
//! fixed grid, and ticket codes are QR images serialized as data URIs so the
//! client can drop them straight into an `<img>` tag.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use rand::Rng;
use showtimex_core::domain::SeatLabel;
use showtimex_core::ports::{TicketCodeError, TicketIssuer};

/// A ticket issuer backed by a thread-local RNG and the `qrcode` encoder.
#[derive(Clone, Default)]
pub struct QrTicketIssuer;

impl QrTicketIssuer {
    pub fn new() -> Self {
        Self
    }
}

impl TicketIssuer for QrTicketIssuer {
    fn assign_seat(&self) -> SeatLabel {
        let mut rng = rand::thread_rng();
        let row = SeatLabel::ROWS[rng.gen_range(0..SeatLabel::ROWS.len())];
        let number = rng.gen_range(1..=SeatLabel::SEATS_PER_ROW);
        SeatLabel { row, number }
    }

    fn encode_ticket(&self, payload: &str) -> Result<String, TicketCodeError> {
        let code = QrCode::new(payload.as_bytes())
            .map_err(|e| TicketCodeError(format!("QR encoding failed: {e}")))?;
        let img = code.render::<Luma<u8>>().build();

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| TicketCodeError(format!("PNG serialization failed: {e}")))?;

        Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seats_stay_inside_the_grid() {
        let issuer = QrTicketIssuer::new();
        for _ in 0..1000 {
            let seat = issuer.assign_seat();
            assert!(SeatLabel::ROWS.contains(&seat.row));
            assert!(seat.number >= 1 && seat.number <= SeatLabel::SEATS_PER_ROW);
            // The rendered label parses back to the same seat.
            assert_eq!(seat.to_string().parse::<SeatLabel>().unwrap(), seat);
        }
    }

    #[test]
    fn seat_draws_repeat_once_the_grid_is_exhausted() {
        // 8 rows x 30 seats = 240 distinct labels, so 241 draws must collide.
        let issuer = QrTicketIssuer::new();
        let mut seen = HashSet::new();
        for _ in 0..241 {
            let seat = issuer.assign_seat();
            seen.insert((seat.row, seat.number));
        }
        assert!(seen.len() < 241);
    }

    #[test]
    fn encoded_ticket_scans_back_to_the_payload() {
        let payload = "Dune | 09:00-12:00 | Seat B7 | alice";
        let issuer = QrTicketIssuer::new();
        let uri = issuer.encode_ticket(payload).unwrap();

        let b64 = uri.strip_prefix("data:image/png;base64,").unwrap();
        let png = BASE64.decode(b64).unwrap();
        let gray = image::load_from_memory(&png).unwrap().into_luma8();

        let mut scanner = quircs::Quirc::default();
        let mut codes = scanner.identify(gray.width() as usize, gray.height() as usize, &gray);
        let code = codes.next().unwrap().unwrap();
        let decoded = code.decode().unwrap();
        assert_eq!(std::str::from_utf8(&decoded.payload).unwrap(), payload);
    }

    #[test]
    fn oversized_payloads_are_rejected() {
        let issuer = QrTicketIssuer::new();
        // Beyond the binary capacity of the largest QR version.
        let payload = "x".repeat(4000);
        assert!(issuer.encode_ticket(&payload).is_err());
    }
}
