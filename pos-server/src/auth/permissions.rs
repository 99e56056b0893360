//! 角色 → 权限映射
//!
//! 权限采用 `resource:action` 字符串，随登录响应下发给前端，
//! 前端据此决定菜单和按钮的可见性。

use shared::models::UserRole;

/// 返回角色对应的权限列表
pub fn permissions_for_role(role: UserRole) -> Vec<String> {
    let perms: &[&str] = match role {
        UserRole::Admin => &[
            "product:view", "product:create", "product:edit", "product:delete",
            "order:view", "order:create", "order:cancel", "order:refund",
            "inventory:view", "inventory:manage",
            "user:view", "user:manage",
            "report:view", "report:export",
            "config:view", "config:manage",
            "system:admin",
        ],
        UserRole::Manager => &[
            "product:view", "product:create", "product:edit",
            "order:view", "order:create", "order:cancel", "order:refund",
            "inventory:view", "inventory:manage",
            "user:view",
            "report:view", "report:export",
            "config:view",
        ],
        UserRole::Cashier => &[
            "product:view",
            "order:view", "order:create",
            "inventory:view",
            "user:view",
        ],
        UserRole::Staff => &["product:view", "order:view", "inventory:view"],
    };
    perms.iter().map(|s| s.to_string()).collect()
}
