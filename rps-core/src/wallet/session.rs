use crate::contract::GameContract;
use crate::error::{GameError, Result};
use crate::storage::{SessionStore, Storage, KEY_ACCOUNT, KEY_IS_ADMIN};
use crate::types::Session;
use crate::wallet::WalletProvider;

use ethers::types::Address;
use ethers::utils::to_checksum;
use std::str::FromStr;
use std::sync::Arc;

/// Owns the persisted session: logged out until `login`, logged in until `logout`.
#[derive(Clone)]
pub struct SessionManager {
    storage: Arc<Storage>,
}

impl SessionManager {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Asks the wallet for its accounts and records the first one, flagged as
    /// admin when it owns the contract. Nothing is written on failure.
    pub async fn login(
        &self,
        wallet: Option<&dyn WalletProvider>,
        contract: &dyn GameContract,
    ) -> Result<Session> {
        let wallet = wallet.ok_or(GameError::ProviderMissing)?;

        let accounts = wallet.request_accounts().await?;
        let account = *accounts.first().ok_or(GameError::NoAccountsAuthorized)?;

        let owner = contract.owner().await?;
        let is_admin = owner == account;

        SessionStore::new(&self.storage)
            .save_session(&to_checksum(&account, None), is_admin)
            .await?;

        tracing::info!("Logged in as {:#x} (admin: {})", account, is_admin);
        Ok(Session { account, is_admin })
    }

    pub async fn logout(&self) -> Result<()> {
        SessionStore::new(&self.storage).clear().await?;
        tracing::info!("Logged out");
        Ok(())
    }

    pub async fn current_account(&self) -> Result<Option<Address>> {
        let stored = SessionStore::new(&self.storage).get(KEY_ACCOUNT).await?;

        Ok(stored.and_then(|value| match Address::from_str(&value) {
            Ok(address) => Some(address),
            Err(e) => {
                tracing::warn!("Ignoring malformed stored account '{}': {}", value, e);
                None
            }
        }))
    }

    /// Admin only counts alongside a readable account.
    pub async fn is_admin(&self) -> Result<bool> {
        if self.current_account().await?.is_none() {
            return Ok(false);
        }
        let stored = SessionStore::new(&self.storage).get(KEY_IS_ADMIN).await?;
        Ok(stored.as_deref() == Some("true"))
    }

    pub async fn session(&self) -> Result<Option<Session>> {
        let Some(account) = self.current_account().await? else {
            return Ok(None);
        };

        Ok(Some(Session {
            account,
            is_admin: self.is_admin().await?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockContract, StaticWallet};
    use crate::contract::Binder;

    fn owner() -> Address {
        Address::repeat_byte(0x0a)
    }

    async fn manager() -> SessionManager {
        SessionManager::new(Arc::new(Storage::in_memory().await.unwrap()))
    }

    #[tokio::test]
    async fn test_login_without_wallet() {
        let sessions = manager().await;
        let contract = MockContract::new(owner()).bind(None);

        let err = sessions.login(None, contract.as_ref()).await.unwrap_err();
        assert!(matches!(err, GameError::ProviderMissing));
        assert_eq!(sessions.current_account().await.unwrap(), None);
        assert!(!sessions.is_admin().await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_previous_session() {
        let sessions = manager().await;
        let contract = MockContract::new(owner()).bind(None);

        let first = StaticWallet::new(vec![owner()]);
        sessions.login(Some(&first), contract.as_ref()).await.unwrap();

        let empty = StaticWallet::new(vec![]);
        let err = sessions.login(Some(&empty), contract.as_ref()).await.unwrap_err();
        assert!(matches!(err, GameError::NoAccountsAuthorized));

        let err = sessions.login(None, contract.as_ref()).await.unwrap_err();
        assert!(matches!(err, GameError::ProviderMissing));

        assert_eq!(sessions.current_account().await.unwrap(), Some(owner()));
        assert!(sessions.is_admin().await.unwrap());
    }

    #[tokio::test]
    async fn test_rejected_wallet() {
        let sessions = manager().await;
        let contract = MockContract::new(owner()).bind(None);

        let err = sessions
            .login(Some(&StaticWallet::rejecting()), contract.as_ref())
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::NoAccountsAuthorized));
        assert_eq!(sessions.session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let sessions = manager().await;
        let contract = MockContract::new(owner()).bind(None);
        let player = Address::repeat_byte(0x0b);

        let wallet = StaticWallet::new(vec![player, owner()]);
        let session = sessions.login(Some(&wallet), contract.as_ref()).await.unwrap();
        assert_eq!(session, Session { account: player, is_admin: false });
        assert_eq!(sessions.current_account().await.unwrap(), Some(player));
        assert!(!sessions.is_admin().await.unwrap());
        assert_eq!(sessions.session().await.unwrap(), Some(session));

        sessions.logout().await.unwrap();
        assert_eq!(sessions.current_account().await.unwrap(), None);
        assert!(!sessions.is_admin().await.unwrap());

        // logging out twice is fine
        sessions.logout().await.unwrap();
    }

    #[tokio::test]
    async fn test_admin_match_ignores_letter_case() {
        let sessions = manager().await;
        let upper = Address::from_str("0xF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266").unwrap();
        let lower = Address::from_str("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap();
        let contract = MockContract::new(upper).bind(None);

        let wallet = StaticWallet::new(vec![lower]);
        let session = sessions.login(Some(&wallet), contract.as_ref()).await.unwrap();
        assert!(session.is_admin);
        assert!(sessions.is_admin().await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_account_reads_as_absent() {
        let storage = Arc::new(Storage::in_memory().await.unwrap());
        SessionStore::new(&storage)
            .save_session("garbage", true)
            .await
            .unwrap();

        let sessions = SessionManager::new(storage);
        assert_eq!(sessions.current_account().await.unwrap(), None);
        assert_eq!(sessions.session().await.unwrap(), None);
        assert!(!sessions.is_admin().await.unwrap());
    }
}
