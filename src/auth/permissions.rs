//! Permission Definitions
//!
//! Simplified RBAC: every role maps to a fixed capability list, baked into
//! the JWT at login.
//!
//! ## 设计原则
//! - 访客路由（房间列表、自己的预订、评价）只要求登录，不检查权限
//! - 模块化权限：按功能模块授权
//! - 用户管理：仅 admin 角色可用

use crate::db::models::Role;

/// 所有可授予的模块权限
pub const ALL_PERMISSIONS: &[&str] = &[
    "rooms:manage",         // 客房增删
    "rooms:update",         // 客房信息与状态修改
    "bookings:manage",      // 查看全部预订、办理入住/退房
    "billing:manage",       // 账单操作
    "events:manage",        // 宴会预约处理与开票
    "tasks:manage",         // 工单创建/指派/删除
    "tasks:update",         // 工单状态更新 (清洁/维修人员)
    "inquiries:manage",     // 留言查看与回复
    "notifications:view",   // 通知面板
    "reports:view",         // 报表查看
    "search:use",           // 全局搜索
    "chat:staff",           // 员工聊天频道
];

/// Admin 专属权限
pub const ADMIN_ONLY_PERMISSIONS: &[&str] = &[
    "users:manage", // 用户管理
    "all",          // 超级权限
];

const STAFF_COMMON: &[&str] = &["notifications:view", "search:use", "chat:staff"];

const FRONT_DESK: &[&str] = &[
    "rooms:update",
    "bookings:manage",
    "billing:manage",
    "events:manage",
    "tasks:manage",
    "tasks:update",
    "inquiries:manage",
];

/// Get the permission set granted to a role
pub fn permissions_for(role: Role) -> Vec<String> {
    let slices: Vec<&[&str]> = match role {
        Role::Admin => vec![&["all"]],
        Role::Manager => vec![STAFF_COMMON, FRONT_DESK, &["rooms:manage", "reports:view"]],
        Role::Receptionist => vec![STAFF_COMMON, FRONT_DESK],
        Role::Housekeeping | Role::HotelStaff => vec![STAFF_COMMON, &["tasks:update"]],
        Role::Guest => vec![],
    };
    slices
        .into_iter()
        .flatten()
        .map(|s| s.to_string())
        .collect()
}

/// Validate if a permission string is valid
pub fn is_valid_permission(permission: &str) -> bool {
    ALL_PERMISSIONS.contains(&permission)
        || ADMIN_ONLY_PERMISSIONS.contains(&permission)
        || permission.ends_with(":*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_can_manage_rooms_but_not_users() {
        let perms = permissions_for(Role::Manager);
        assert!(perms.contains(&"rooms:manage".to_string()));
        assert!(perms.contains(&"reports:view".to_string()));
        assert!(!perms.contains(&"users:manage".to_string()));
    }

    #[test]
    fn test_receptionist_cannot_view_reports() {
        let perms = permissions_for(Role::Receptionist);
        assert!(perms.contains(&"bookings:manage".to_string()));
        assert!(!perms.contains(&"reports:view".to_string()));
        assert!(!perms.contains(&"rooms:manage".to_string()));
    }

    #[test]
    fn test_housekeeping_only_updates_tasks() {
        let perms = permissions_for(Role::Housekeeping);
        assert!(perms.contains(&"tasks:update".to_string()));
        assert!(!perms.contains(&"tasks:manage".to_string()));
    }

    #[test]
    fn test_guest_has_no_staff_permissions() {
        assert!(permissions_for(Role::Guest).is_empty());
    }

    #[test]
    fn test_granted_permissions_are_valid() {
        for role in [
            Role::Manager,
            Role::Receptionist,
            Role::Housekeeping,
            Role::HotelStaff,
        ] {
            for p in permissions_for(role) {
                assert!(is_valid_permission(&p), "invalid permission granted: {p}");
            }
        }
    }
}
