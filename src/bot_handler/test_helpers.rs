use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use teloxide::types::{
    Chat, ChatId, ChatKind, ChatPrivate, MediaKind, MediaText, Message, MessageCommon, MessageId,
    MessageKind, User, UserId,
};

use crate::{
    bot_handler::BotHandler,
    license::{License, LicenseStatus},
    messaging::MockMessagingService,
    service::MockLicenseService,
};

pub const CHAT_ID: ChatId = ChatId(123);
pub const AUTHORIZED_USER: UserId = UserId(42);
pub const INTRUDER: UserId = UserId(777);

// Builds a handler whose allow-list contains only AUTHORIZED_USER.
pub fn handler_with(
    mock_messaging: MockMessagingService,
    mock_license: MockLicenseService,
) -> BotHandler {
    BotHandler::new(Arc::new(mock_messaging), Arc::new(mock_license), vec![AUTHORIZED_USER])
}

pub fn sample_license() -> License {
    License {
        key: "AAAA-BBBB-CCCC-DDDD".to_string(),
        cpf_cnpj: "111.111.111-11".parse().unwrap(),
        status: LicenseStatus::Active,
        expires_at: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
        created_at: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
        plan: "profissional".to_string(),
    }
}

fn mock_user(user_id: UserId) -> User {
    User {
        id: user_id,
        is_bot: false,
        first_name: "Test".to_string(),
        last_name: None,
        username: Some("testuser".to_string()),
        language_code: None,
        is_premium: false,
        added_to_attachment_menu: false,
    }
}

// Helper to create a mock teloxide message to reduce boilerplate in tests.
pub fn mock_message(chat_id: ChatId, sender: Option<UserId>, text: &str) -> Message {
    Message {
        id: MessageId(1),
        date: Utc::now(),
        chat: Chat {
            id: chat_id,
            kind: ChatKind::Private(ChatPrivate {
                username: Some("test".to_string()),
                first_name: Some("Test".to_string()),
                last_name: None,
            }),
        },
        kind: MessageKind::Common(MessageCommon {
            media_kind: MediaKind::Text(MediaText {
                text: text.to_string(),
                entities: vec![],
                link_preview_options: None,
            }),
            reply_to_message: None,
            reply_markup: None,
            edit_date: None,
            author_signature: None,
            has_protected_content: false,
            is_automatic_forward: false,
            effect_id: None,
            forward_origin: None,
            external_reply: None,
            quote: None,
            reply_to_story: None,
            sender_boost_count: None,
            is_from_offline: false,
            business_connection_id: None,
        }),
        from: sender.map(mock_user),
        is_topic_message: false,
        sender_business_bot: None,
        sender_chat: None,
        thread_id: None,
        via_bot: None,
    }
}
