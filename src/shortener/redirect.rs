//! Resolving identifiers to their destination

use chrono::Utc;

use crate::database::Storage;

use super::LinkError;

/// Resolve an identifier to its destination URL, counting the click
///
/// Unknown and inactive links give `None` and are left untouched. The click is counted by the
/// storage in a single atomic step, concurrent resolutions never lose an increment.
pub async fn resolve(storage: &dyn Storage, identifier: &str) -> Result<Option<String>, LinkError> {
    let link = storage.record_click(identifier, Utc::now()).await?;

    Ok(link.map(|link| link.destination_url))
}

#[cfg(test)]
mod tests {
    use crate::database::CreateLinkValues;
    use crate::database::Database;
    use crate::database::DatabaseConfig;

    use super::*;

    async fn setup() -> Database {
        let database = Database::from_config(DatabaseConfig::InMemory).await.unwrap();

        database
            .create_link(&CreateLinkValues {
                owner_id: None,
                identifier: "hello",
                destination_url: "https://www.example.com/",
                custom_slug: Some("hello"),
            })
            .await
            .unwrap();

        database
    }

    #[tokio::test]
    async fn test_resolve() {
        let database = setup().await;

        let destination = resolve(&*database, "hello").await.unwrap();
        assert_eq!(Some("https://www.example.com/".to_string()), destination);

        let first = database
            .find_single_link_by_identifier("hello")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(1, first.click_count);

        resolve(&*database, "hello").await.unwrap();

        let second = database
            .find_single_link_by_identifier("hello")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(2, second.click_count);
        assert!(second.last_accessed_at >= first.last_accessed_at);
    }

    #[tokio::test]
    async fn test_resolve_unknown() {
        let database = setup().await;

        assert_eq!(None, resolve(&*database, "nope").await.unwrap());
        // case-sensitive
        assert_eq!(None, resolve(&*database, "HELLO").await.unwrap());

        let link = database
            .find_single_link_by_identifier("hello")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(0, link.click_count);
        assert_eq!(None, link.last_accessed_at);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_resolve_concurrently() {
        let database = setup().await;

        let handles = (0..100)
            .map(|_| {
                let database = database.clone();
                tokio::spawn(async move { resolve(&*database, "hello").await.unwrap() })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }

        let link = database
            .find_single_link_by_identifier("hello")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(100, link.click_count);
    }
}
