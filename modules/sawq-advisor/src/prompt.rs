//! Arabic marketing-prompt assembly.
//!
//! The prompt is a fixed instructional template plus a worked example (a
//! finished marketing brief for premium Ajwa dates) followed by the market
//! context aggregated from fetched pages. The model's reply is shown to the
//! user essentially verbatim; only doubled newlines are collapsed.

/// Worked example the model is asked to imitate.
pub const EXAMPLE_BRIEF: &str = r#"🌟 تمر العجوة الفاخر - مذاق الأجداد بنكهة حديثة

**الوصف:**
تمتع بمذاق تمر العجوة الفاخر، المقطوف بعناية من مزارع المدينة المنورة. يتميز بنكهته الغنية وقيمته الغذائية العالية التي تجعله الخيار المثالي لمحبي التمور.

**المميزات التنافسية:**
- طبيعي 100% بدون إضافات
- حاصل على شهادة الجودة السعودية
- طعم فريد وقوام ناعم
- متوفر بعبوات متنوعة تناسب جميع الأذواق
- شحن سريع لجميع مناطق المملكة

**الجمهور المستهدف:**
- محبي التمور الفاخرة
- المهتمون بالتغذية الصحية
- الباحثون عن هدايا فاخرة

**اقتراحات للحملات التسويقية:**
1. **حملات موسمية:**
- عروض شهر رمضان
- باقات هدايا للأعياد والمناسبات

2. **حملات رقمية:**
- فيديوهات توعوية عن فوائد التمر
- مشاركة وصفات صحية باستخدام المنتج

**شعار الحملة:**
"تمر العجوة – تراث أصيل، مذاق فريد"
"#;

/// Assemble the full generation prompt from the aggregated market context.
pub fn build_marketing_prompt(market_context: &str) -> String {
    format!(
        r#"اعتمد على المثال التالي لإنشاء محتوى تسويقي مشابه للمنتج التالي، مع دراسة المحتوى المقدم واستنتاج استراتيجيات التسويق منه:

**مثال:**
{EXAMPLE_BRIEF}

**المحتوى المستخرج من الإنترنت:**
{market_context}

**المطلوب:**
- تحليل المحتوى المقدم واستخراج الاستراتيجيات التسويقية منه.
- إنشاء محتوى تسويقي يشمل:
- وصف جذاب للمنتج.
- فوائد تنافسية.
- الجمهور المستهدف.
- اقتراحات للحملات التسويقية.
- شعار مناسب.

"يرجى التأكد من أن المحتوى يظهر بوضوح وبشكل منظم مع استخدام العناوين والقوائم لزيادة قابلية القراءة"
"#
    )
}

/// Cosmetic cleanup applied to the model's reply before display.
pub fn collapse_double_newlines(text: &str) -> String {
    text.replace("\n\n", "\n")
}
