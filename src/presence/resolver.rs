//! Mention resolution.
//!
//! A message refers to an AFK user if it replies to them, links them with a
//! clickable mention, or contains `@handle` anywhere in its text (case
//! insensitive, plain substring match).

use std::collections::BTreeSet;

use tracing::debug;

use crate::database::AfkSnapshot;
use crate::platform::{AdapterError, InboundMessage, PlatformAdapter};
use crate::strings;
use super::format_duration;

/// Set of referenced AFK user IDs.
pub type Mentioned = BTreeSet<u64>;

/// Finds AFK users referenced by a message and renders notices for them.
pub struct MentionResolver;

impl MentionResolver {
    /// Collect every AFK user `msg` refers to.
    pub async fn resolve(
        msg: &InboundMessage,
        snapshot: &AfkSnapshot,
        adapter: &dyn PlatformAdapter,
    ) -> Result<Mentioned, AdapterError> {
        let mut mentioned = Mentioned::new();
        if snapshot.is_empty() {
            return Ok(mentioned);
        }

        // 1. Reply to an AFK user
        if let Some(target) = msg.reply_target_sender_id()
            && snapshot.contains_key(&target)
        {
            mentioned.insert(target);
        }

        // 2. Clickable mentions
        mentioned.extend(
            msg.explicit_mention_user_ids
                .iter()
                .copied()
                .filter(|id| snapshot.contains_key(id)),
        );

        // 3. @handle anywhere in the text
        if msg.text.contains('@') {
            let text = msg.text.to_lowercase();
            for &user_id in snapshot.keys() {
                let Some(handle) = adapter.resolve_display_handle(user_id).await? else {
                    continue;
                };
                if !handle.is_empty() && text.contains(&format!("@{}", handle.to_lowercase())) {
                    mentioned.insert(user_id);
                }
            }
        }

        debug!(count = mentioned.len(), "Resolved AFK mentions");
        Ok(mentioned)
    }

    /// One AFK notice per mentioned user, blank-line separated.
    ///
    /// Returns `None` if nobody was mentioned.
    pub async fn render(
        mentioned: &Mentioned,
        snapshot: &AfkSnapshot,
        adapter: &dyn PlatformAdapter,
        now: i64,
    ) -> Result<Option<String>, AdapterError> {
        let mut notices = Vec::with_capacity(mentioned.len());

        for user_id in mentioned {
            let Some(record) = snapshot.get(user_id) else {
                continue;
            };
            let name = adapter
                .resolve_display_name(*user_id)
                .await?
                .unwrap_or_else(|| record.display_name.clone());
            let duration = format_duration(record.elapsed_secs(now));
            notices.push(strings::is_afk(&name, &record.reason, &duration));
        }

        if notices.is_empty() {
            return Ok(None);
        }
        Ok(Some(notices.join("\n\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::AfkRecord;
    use crate::platform::mock::MockAdapter;
    use crate::platform::ReplyTarget;

    fn snapshot(ids: &[(u64, &str)]) -> AfkSnapshot {
        ids.iter()
            .map(|(id, name)| (*id, AfkRecord::new(*id, "away", *name, 0)))
            .collect()
    }

    fn adapter_with_handles(handles: &'static [(u64, &'static str)]) -> MockAdapter {
        let mut adapter = MockAdapter::new();
        adapter.expect_resolve_display_handle().returning(move |id| {
            Ok(handles
                .iter()
                .find(|(uid, _)| *uid == id)
                .map(|(_, h)| h.to_string()))
        });
        adapter
    }

    fn message(text: &str) -> InboundMessage {
        InboundMessage {
            sender_id: 99,
            sender_display_name: "Zed".into(),
            text: text.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_reply_and_mention_collapse() {
        let afk = snapshot(&[(1, "Ann")]);
        let adapter = adapter_with_handles(&[]);
        let mut msg = message("hey");
        msg.is_reply = true;
        msg.reply_target = Some(ReplyTarget {
            sender_id: 1,
            sender_display_name: "Ann".into(),
        });
        msg.explicit_mention_user_ids = vec![1, 1];

        let mentioned = MentionResolver::resolve(&msg, &afk, &adapter).await.unwrap();
        assert_eq!(mentioned.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn test_present_users_ignored() {
        let afk = snapshot(&[(1, "Ann")]);
        let adapter = adapter_with_handles(&[(1, "ann")]);
        let mut msg = message("@bob hi");
        msg.reply_target = Some(ReplyTarget {
            sender_id: 2,
            sender_display_name: "Bob".into(),
        });
        msg.explicit_mention_user_ids = vec![3];

        let mentioned = MentionResolver::resolve(&msg, &afk, &adapter).await.unwrap();
        assert!(mentioned.is_empty());
    }

    #[tokio::test]
    async fn test_handle_match_case_insensitive_substring() {
        let afk = snapshot(&[(1, "Ann"), (2, "Bob"), (3, "Cy")]);
        let adapter = adapter_with_handles(&[(1, "AnnA"), (2, "bob")]);

        let msg = message("ping @annabelle and @BOB");
        let mentioned = MentionResolver::resolve(&msg, &afk, &adapter).await.unwrap();
        assert_eq!(mentioned.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_handle_needs_at_prefix() {
        let afk = snapshot(&[(1, "Ann")]);
        let adapter = adapter_with_handles(&[(1, "ann")]);

        let msg = message("ann are you there @");
        assert!(MentionResolver::resolve(&msg, &afk, &adapter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let afk = snapshot(&[(1, "Ann")]);
        let mut adapter = MockAdapter::new();
        adapter
            .expect_resolve_display_handle()
            .returning(|_| Err(AdapterError::Lookup("timeout".into())));

        let msg = message("@ann");
        assert!(MentionResolver::resolve(&msg, &afk, &adapter).await.is_err());
    }

    #[tokio::test]
    async fn test_render_joins_notices() {
        let mut afk = snapshot(&[(1, "Ann"), (2, "Bob")]);
        afk.get_mut(&2).unwrap().reason = "gone fishing".into();

        let mut adapter = MockAdapter::new();
        adapter
            .expect_resolve_display_name()
            .returning(|id| Ok((id == 1).then(|| "Annie".to_string())));

        let mentioned: Mentioned = [1, 2].into_iter().collect();
        let text = MentionResolver::render(&mentioned, &afk, &adapter, 65)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            text,
            "Annie is AFK\nReason: away\nSince: 1m 5s\n\nBob is AFK\nReason: gone fishing\nSince: 1m 5s"
        );
    }

    #[tokio::test]
    async fn test_render_empty_is_none() {
        let adapter = MockAdapter::new();
        let rendered = MentionResolver::render(&Mentioned::new(), &AfkSnapshot::new(), &adapter, 0)
            .await
            .unwrap();
        assert!(rendered.is_none());
    }
}
