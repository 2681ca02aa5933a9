use crate::error::{MosqueError, Result};
use crate::models::{Role, Session};

/// Admins always; imams only while they have no mosque of their own.
pub fn can_create(session: &Session) -> Result<()> {
    match (session.role, session.mosque_id) {
        (Role::Admin, _) => Ok(()),
        (Role::Imam, None) => Ok(()),
        (Role::Imam, Some(id)) => Err(MosqueError::forbidden(format!(
            "imam '{}' is already associated with mosque {}",
            session.user, id
        ))),
        (Role::Guest, _) => Err(MosqueError::forbidden("only imams and admins can add mosques")),
    }
}

/// Admins may edit any mosque; an imam only the one they are associated with.
pub fn can_update(session: &Session, mosque_id: i64) -> Result<()> {
    match session.role {
        Role::Admin => Ok(()),
        Role::Imam if session.mosque_id == Some(mosque_id) => Ok(()),
        Role::Imam => Err(MosqueError::forbidden(format!(
            "imam '{}' is not associated with mosque {}",
            session.user, mosque_id
        ))),
        Role::Guest => Err(MosqueError::forbidden("only imams and admins can edit mosques")),
    }
}

fn admin_only(session: &Session, action: &str) -> Result<()> {
    if session.role == Role::Admin {
        Ok(())
    } else {
        Err(MosqueError::forbidden(format!(
            "only admins can {} (current role: {})",
            action, session.role
        )))
    }
}

pub fn can_verify(session: &Session) -> Result<()> {
    admin_only(session, "verify mosques")
}

pub fn can_reject(session: &Session) -> Result<()> {
    admin_only(session, "reject mosques")
}

pub fn can_delete(session: &Session) -> Result<()> {
    admin_only(session, "delete mosques")
}

pub fn can_list_unverified(session: &Session) -> Result<()> {
    admin_only(session, "list unverified mosques")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role, mosque_id: Option<i64>) -> Session {
        Session {
            user: "tester".into(),
            role,
            mosque_id,
        }
    }

    #[test]
    fn create_rules() {
        assert!(can_create(&session(Role::Admin, Some(1))).is_ok());
        assert!(can_create(&session(Role::Imam, None)).is_ok());
        assert!(matches!(
            can_create(&session(Role::Imam, Some(2))),
            Err(MosqueError::Forbidden(_))
        ));
        assert!(can_create(&Session::guest()).is_err());
    }

    #[test]
    fn update_rules() {
        assert!(can_update(&session(Role::Admin, None), 7).is_ok());
        assert!(can_update(&session(Role::Imam, Some(7)), 7).is_ok());
        assert!(can_update(&session(Role::Imam, Some(8)), 7).is_err());
        assert!(can_update(&session(Role::Imam, None), 7).is_err());
        assert!(can_update(&session(Role::Guest, Some(7)), 7).is_err());
    }

    #[test]
    fn moderation_is_admin_only() {
        let admin = session(Role::Admin, None);
        let imam = session(Role::Imam, Some(1));
        for check in [can_verify, can_reject, can_delete, can_list_unverified] {
            assert!(check(&admin).is_ok());
            assert!(check(&imam).is_err());
            assert!(check(&Session::guest()).is_err());
        }
    }
}
