//! Fixture payloads and tokens

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use serde_json::{json, Value};
use ticketdesk::models::{User, UserRole};

#[derive(Serialize)]
struct Claims {
    sub: i64,
    exp: i64,
}

/// A signed access token expiring `seconds_from_now` seconds from now
pub fn access_token(user_id: i64, seconds_from_now: i64) -> String {
    let claims = Claims {
        sub: user_id,
        exp: (Utc::now() + Duration::seconds(seconds_from_now)).timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret"))
        .expect("Failed to encode test token")
}

pub fn attendee() -> User {
    User {
        id: 1,
        first_name: Some("Ana".to_string()),
        last_name: Some("Horvat".to_string()),
        email: "ana@example.com".to_string(),
        role: UserRole::User,
    }
}

pub fn organizer() -> User {
    User {
        id: 7,
        first_name: Some("Marko".to_string()),
        last_name: Some("Kovač".to_string()),
        email: "marko@example.com".to_string(),
        role: UserRole::Organizer,
    }
}

pub fn user_json(user: &User) -> Value {
    serde_json::to_value(user).expect("Failed to serialize user")
}

pub fn auth_json(token: &str, refresh_token: &str, user: &User) -> Value {
    json!({
        "token": token,
        "refreshToken": refresh_token,
        "user": user_json(user),
    })
}

/// An upcoming event with a Regular and a VIP type
pub fn event_json(id: i64, tickets_sold: i64, total_tickets: i64) -> Value {
    json!({
        "id": id,
        "title": "Summer Jazz Night",
        "description": "Open air concert",
        "location": "Zagreb",
        "start_datetime": "2030-07-01T19:00:00Z",
        "end_datetime": "2030-07-01T23:00:00Z",
        "total_tickets": total_tickets,
        "tickets_sold": tickets_sold,
        "is_past": false,
        "organizer_id": 7,
        "organizer_name": "Marko Kovač",
        "ticket_types": [
            {
                "id": 11,
                "event_id": id,
                "type": "Regular",
                "price": "20.00",
                "total_tickets": total_tickets - 2,
                "tickets_sold": (tickets_sold - 2).max(0),
            },
            {
                "id": 12,
                "event_id": id,
                "type": "VIP",
                "price": 55.5,
                "total_tickets": 2,
                "tickets_sold": tickets_sold.min(2),
            }
        ]
    })
}

pub fn ticket_json(id: i64, event_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "event_id": event_id,
        "ticket_type_id": 11,
        "ticket_type": "Regular",
        "ticket_price": "20.00",
        "user_id": 1,
        "transaction_id": 100 + id,
        "status": status,
        "event_name": "Summer Jazz Night",
        "start_datetime": "2030-07-01T19:00:00Z",
        "end_datetime": "2030-07-01T23:00:00Z",
    })
}
