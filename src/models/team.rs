//! Team models and DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::User;

/// A team and its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    pub members: Vec<User>,
}

/// Team member as sent and received over the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamMember {
    pub user_id: Uuid,
    pub username: String,
    pub is_active: bool,
}

/// Body of POST /team/add and response of both team endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamPayload {
    pub team_name: String,
    pub members: Vec<TeamMember>,
}

/// Query parameters for GET /team/get.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TeamQuery {
    pub team_name: Option<String>,
}

impl TeamPayload {
    /// Convert into a domain team; members inherit the team name.
    pub fn into_team(self) -> Team {
        let name = self.team_name;
        let members = self
            .members
            .into_iter()
            .map(|m| User {
                id: m.user_id,
                username: m.username,
                is_active: m.is_active,
                team_name: name.clone(),
            })
            .collect();

        Team { name, members }
    }
}

impl From<Team> for TeamPayload {
    fn from(team: Team) -> Self {
        Self {
            team_name: team.name,
            members: team
                .members
                .into_iter()
                .map(|u| TeamMember {
                    user_id: u.id,
                    username: u.username,
                    is_active: u.is_active,
                })
                .collect(),
        }
    }
}
