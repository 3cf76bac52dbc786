//! Column, sheet, file and rate constants for the cost report schema.
//! Single source of truth for every fixed business string.

// ── Join keys ───────────────────────────────────────────────────────────────
pub mod keys {
    pub const PATIENT_NAME: &str = "病患姓名";
    pub const RECORD_NUMBER: &str = "病歷號";
    pub const PHYSICIAN: &str = "醫師";
    pub const SITE_CODE: &str = "手術院碼";
}

// ── Conventional workbook file names, in upload order ───────────────────────
pub mod files {
    pub const COST_ITEMS: &str = "1.分項成本.xlsx";
    pub const OR_TIME: &str = "2.開刀房時間.xlsx";
    pub const PHYSICIAN_SALARY: &str = "3.醫師薪資.xlsx";
    pub const SURGERY_REGISTRY: &str = "4.手術檔.xlsx";
    pub const PHYSICIAN_COMMISSION: &str = "5.醫師抽成費.xlsx";
    pub const EQUIPMENT_USAGE: &str = "6.設備使用檔.xlsx";
    pub const MATERIAL_PROFIT: &str = "7.手術材料檔.xlsx";
}

// ── Worksheets required by name ─────────────────────────────────────────────
pub mod sheets {
    pub const COST_ITEMS: &str = "成本1-52";
    pub const SURGERY_REGISTRY: &str = "總合併";
    pub const MATERIAL_PROFIT: &str = "材料利潤";
}

// ── Cost items (分項成本) payload ───────────────────────────────────────────
pub mod cost_items {
    pub const SPECIAL_MATERIAL_FEE: &str = "特材費";
    pub const DRUG_FEE: &str = "藥費";
    pub const DRUG_MATERIAL_SUBTOTAL: &str = "藥品醫材成本合計";
}

// ── OR time (開刀房時間) payload, minutes unless noted ──────────────────────
pub mod or_time {
    pub const NURSE_MINUTES: &str = "刷手及流動護士";
    pub const ASSISTANT_MINUTES: &str = "外科助手";
    pub const RECOVERY_MINUTES: &str = "恢復室";
    /// Administrative workload parameter, a count rather than minutes.
    pub const PARAMETER_COUNT: &str = "參數";
}

// ── Physician salary (醫師薪資) payload ─────────────────────────────────────
pub mod salary {
    pub const PER_MINUTE_RATE: &str = "醫師每分鐘人力成本";
}

// ── Surgery registry (手術檔) payload ───────────────────────────────────────
pub mod registry {
    pub const DATE: &str = "日期";
    pub const HEADCOUNT: &str = "人數";
    pub const INSURANCE_REVENUE: &str = "健保收入";
    pub const INSURANCE_POINT_VALUE: &str = "健保點值(6%)";
    pub const INSURANCE_NET_REVENUE: &str = "健保收入淨額";
}

// ── Physician commission (醫師抽成費) payload ───────────────────────────────
pub mod commission {
    pub const COMMISSION_FEE: &str = "醫師抽成費";
    pub const COMMISSION_MINUTES: &str = "醫師時間2";
}

// ── Equipment usage (設備使用檔) payload ────────────────────────────────────
pub mod equipment {
    /// Per-minute depreciation rate of the site's equipment.
    pub const DEPRECIATION_RATE: &str = "設備折舊";
    pub const DEPRECIATION_MINUTES: &str = "折舊時間2";
}

// ── Material profit (手術材料檔) payload ────────────────────────────────────
pub mod material {
    pub const INSURED_REVENUE: &str = "健保材料收入";
    pub const SELF_PAY_REVENUE: &str = "自費材料收入";
    pub const REVENUE_SUBTOTAL: &str = "手術材料收入合計";
    pub const COST: &str = "材料成本";
    pub const INSURED_POINT_VALUE: &str = "健保材料點值(6%)";
    pub const NET_PROFIT: &str = "材料淨利潤";
}

// ── Derived cost columns ────────────────────────────────────────────────────
pub mod derived {
    pub const PHYSICIAN_FIXED_SALARY_COST: &str = "醫師固定薪成本";
    pub const NURSE_COST: &str = "刷手及流動護士成本";
    pub const ASSISTANT_COST: &str = "外科助手成本";
    pub const RECOVERY_COST: &str = "恢復室成本";
    pub const ADMIN_STAFF_COST: &str = "行政人員";
    pub const TOTAL_LABOR_COST: &str = "用人成本合計";
    pub const EQUIPMENT_DEPRECIATION_COST: &str = "設備折舊成本";
    pub const FACILITY_DEPRECIATION_COST: &str = "房屋折舊成本";
    pub const TOTAL_DEPRECIATION_COST: &str = "總折舊成本";
    pub const MAINTENANCE_COST: &str = "維修費用";
    pub const TOTAL_FACILITY_COST: &str = "設施設備費用合計";
    pub const TOTAL_DIRECT_COST: &str = "直接成本合計";
    pub const OVERHEAD_OPERATING_COST: &str = "作業成本";
    pub const ADMIN_OVERHEAD_COST: &str = "行政管理成本";
    pub const GRAND_TOTAL_COST: &str = "成本總計";
}

// ── Cost rates (NT$ per minute unless noted) ────────────────────────────────
pub mod rates {
    pub const NURSE_PER_MINUTE: f64 = 13.31;
    pub const ASSISTANT_PER_MINUTE: f64 = 12.88;
    pub const RECOVERY_PER_MINUTE: f64 = 10.48;
    /// NT$ per unit of the administrative workload parameter.
    pub const ADMIN_STAFF_PER_PARAMETER: f64 = 100.0;
    pub const FACILITY_DEPRECIATION_PER_MINUTE: f64 = 0.71;
    /// Maintenance charge as a share of total depreciation.
    pub const MAINTENANCE_SHARE: f64 = 0.18;
    /// Operating overhead as a share of total direct cost.
    pub const OVERHEAD_OPERATING_SHARE: f64 = 0.15;
    /// Administrative overhead as a share of total direct cost.
    pub const ADMIN_OVERHEAD_SHARE: f64 = 0.05;
}

// ── Report output ───────────────────────────────────────────────────────────
pub mod report {
    use super::{commission, cost_items, derived, keys, material, registry};

    pub const FILE_NAME: &str = "產出報表1-報表版(全部院碼).xlsx";
    pub const SHEET: &str = "報表結果";

    /// Fixed column order of the finalized report.
    pub const COLUMNS: [&str; 33] = [
        keys::SITE_CODE,
        keys::PATIENT_NAME,
        registry::HEADCOUNT,
        keys::RECORD_NUMBER,
        registry::DATE,
        registry::INSURANCE_REVENUE,
        registry::INSURANCE_POINT_VALUE,
        registry::INSURANCE_NET_REVENUE,
        keys::PHYSICIAN,
        commission::COMMISSION_FEE,
        derived::PHYSICIAN_FIXED_SALARY_COST,
        derived::NURSE_COST,
        derived::ASSISTANT_COST,
        derived::RECOVERY_COST,
        derived::ADMIN_STAFF_COST,
        derived::TOTAL_LABOR_COST,
        cost_items::SPECIAL_MATERIAL_FEE,
        cost_items::DRUG_FEE,
        cost_items::DRUG_MATERIAL_SUBTOTAL,
        derived::EQUIPMENT_DEPRECIATION_COST,
        derived::FACILITY_DEPRECIATION_COST,
        derived::MAINTENANCE_COST,
        derived::TOTAL_FACILITY_COST,
        derived::TOTAL_DIRECT_COST,
        derived::OVERHEAD_OPERATING_COST,
        derived::ADMIN_OVERHEAD_COST,
        derived::GRAND_TOTAL_COST,
        material::INSURED_REVENUE,
        material::SELF_PAY_REVENUE,
        material::REVENUE_SUBTOTAL,
        material::COST,
        material::INSURED_POINT_VALUE,
        material::NET_PROFIT,
    ];
}
