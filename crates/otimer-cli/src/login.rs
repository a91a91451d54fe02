use anyhow::Result;
use otimer_client::ClientHandle;
use otimer_core::{ConnectionConfig, SessionIdentity};

use crate::prompt::CredentialSource;

/// Log in with `config`, asking `source` for new credentials after each
/// rejection. `None` means the user gave up.
pub async fn login_until_accepted<S: CredentialSource>(
    handle: &ClientHandle,
    mut config: ConnectionConfig,
    source: &mut S,
) -> Result<Option<SessionIdentity>> {
    loop {
        match handle.login(config.clone()).await {
            Ok(identity) => return Ok(Some(identity)),
            Err(error) => match source.retry_after(&config, &error)? {
                Some(next) => config = next,
                None => return Ok(None),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otimer_client::SessionClient;
    use otimer_core::{ClientSettings, SessionError};
    use otimer_mocks::{MockOdooServer, OdooFixture};
    use std::collections::VecDeque;

    struct ScriptedAnswers {
        answers: VecDeque<ConnectionConfig>,
        reported: Vec<SessionError>,
    }

    impl CredentialSource for ScriptedAnswers {
        fn retry_after(
            &mut self,
            _previous: &ConnectionConfig,
            error: &SessionError,
        ) -> Result<Option<ConnectionConfig>> {
            self.reported.push(error.clone());
            Ok(self.answers.pop_front())
        }
    }

    fn handle() -> ClientHandle {
        ClientHandle::spawn(SessionClient::http(ClientSettings::default()).unwrap())
    }

    #[tokio::test]
    async fn test_rejected_login_asks_again() {
        let server = MockOdooServer::start(OdooFixture::demo()).await.unwrap();
        let good = ConnectionConfig::new(server.base_url(), "demo", "admin", "demo-token");
        let mut bad = good.clone();
        bad.api_token = "typo".to_string();

        let mut source = ScriptedAnswers {
            answers: VecDeque::from(vec![good]),
            reported: Vec::new(),
        };
        let identity = login_until_accepted(&handle(), bad, &mut source)
            .await
            .unwrap();

        assert_eq!(identity.map(|i| i.user_id), Some(2));
        assert_eq!(source.reported, vec![SessionError::LoginFailed]);
        assert_eq!(server.request_count(), 2);
        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_giving_up_reports_each_failure_once() {
        let server = MockOdooServer::start(OdooFixture::demo()).await.unwrap();
        let bad = ConnectionConfig::new(server.base_url(), "demo", "admin", "typo");

        let mut source = ScriptedAnswers {
            answers: VecDeque::new(),
            reported: Vec::new(),
        };
        let identity = login_until_accepted(&handle(), bad, &mut source)
            .await
            .unwrap();

        assert_eq!(identity, None);
        assert_eq!(source.reported, vec![SessionError::LoginFailed]);
        server.shutdown().await;
    }
}
