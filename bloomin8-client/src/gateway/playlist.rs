//! Playlist endpoints.

use super::{DeviceClient, Reply};
use crate::models::{Playlist, PlaylistEntry};

impl DeviceClient {
    /// GET /playlist/list
    pub async fn list_playlists(&self) -> Reply<Vec<PlaylistEntry>> {
        self.send_json(self.get(&["playlist", "list"])?).await
    }

    /// GET /playlist/{name}
    pub async fn playlist(&self, name: &str) -> Reply<Playlist> {
        self.send_json(self.get(&["playlist", name])?).await
    }

    /// PUT /playlist/{name}, creating or replacing it
    pub async fn put_playlist(&self, name: &str, playlist: &Playlist) -> Reply<()> {
        self.send_ack(self.put(&["playlist", name])?.json(playlist)).await
    }

    /// DELETE /playlist/{name}
    pub async fn delete_playlist(&self, name: &str) -> Reply<()> {
        self.send_ack(self.delete(&["playlist", name])?).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{session_for, spawn, FakeFrame};
    use super::*;
    use crate::models::{PlaylistItem, PlaylistKind};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_playlist_round_trip_through_device() {
        let frame = Arc::new(FakeFrame::default());
        let client = DeviceClient::new(&session_for(spawn(frame.clone()).await)).unwrap();

        let listed = client.list_playlists().await.unwrap().unwrap();
        assert_eq!(listed[0].name.as_deref(), Some("mornings"));

        let fetched = client.playlist("mornings").await.unwrap().unwrap();
        assert_eq!(fetched.kind, PlaylistKind::Duration);
        assert_eq!(fetched.items[0].duration, Some(60));

        let playlist = Playlist {
            name: "evenings".to_string(),
            kind: PlaylistKind::Duration,
            items: vec![PlaylistItem {
                name: Some("b.jpg".to_string()),
                duration: Some(120),
                time: None,
            }],
            time_offset: Some(0),
        };
        client.put_playlist("evenings", &playlist).await.unwrap();
        client.delete_playlist("evenings").await.unwrap();

        let recorded = frame.recorded();
        let put = recorded.iter().find(|r| r.method == "PUT").unwrap();
        assert_eq!(put.json.as_ref().unwrap()["list"][0]["duration"], 120);
        assert!(recorded.iter().any(|r| r.method == "DELETE" && r.path == "/playlist/evenings"));
    }
}
