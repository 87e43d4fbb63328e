use shared::Language;

fn pick(lang: Language, [en, tr, ar, ru]: [&'static str; 4]) -> &'static str {
    match lang {
        Language::En => en,
        Language::Tr => tr,
        Language::Ar => ar,
        Language::Ru => ru,
    }
}

/// Translate a key. Unknown keys come back unchanged.
pub fn t(lang: Language, key: &str) -> &str {
    let entry = match key {
        // ── Common ──────────────────────────────────────────
        "common.back" => ["Back", "Geri", "رجوع", "Назад"],
        "common.done" => ["Done", "Tamam", "تم", "Готово"],
        "common.continue" => ["Continue", "Devam", "متابعة", "Продолжить"],
        "common.cancel" => ["Cancel", "İptal", "إلغاء", "Отмена"],
        "common.confirm" => ["Confirm", "Onayla", "تأكيد", "Подтвердить"],
        "common.help" => ["Help", "Yardım", "مساعدة", "Помощь"],

        // ── Entry ───────────────────────────────────────────
        "home.title" => [
            "Assemble your furniture with confidence",
            "Mobilyanızı güvenle kurun",
            "قم بتركيب أثاثك بثقة",
            "Собирайте мебель уверенно",
        ],
        "home.startButton" => ["Start", "Başla", "ابدأ", "Начать"],
        "home.listening" => ["Listening...", "Dinleniyor...", "جارٍ الاستماع...", "Слушаю..."],

        // ── Identify ────────────────────────────────────────
        "identify.title" => [
            "Identify your product",
            "Ürününüzü tanımlayın",
            "تعرّف على منتجك",
            "Определите ваш товар",
        ],
        "identify.scanButton" => ["Scan QR code", "QR kodu tara", "امسح رمز QR", "Сканировать QR-код"],
        "identify.enterModel" => [
            "Enter model number",
            "Model numarasını girin",
            "أدخل رقم الطراز",
            "Введите номер модели",
        ],
        "identify.modelPlaceholder" => [
            "e.g. SMB-CLST-001",
            "örn. SMB-CLST-001",
            "مثال: SMB-CLST-001",
            "напр. SMB-CLST-001",
        ],
        "identify.uploadPhoto" => ["Upload a photo", "Fotoğraf yükle", "ارفع صورة", "Загрузить фото"],
        "identify.success" => [
            "Product identified!",
            "Ürün tanımlandı!",
            "تم التعرف على المنتج!",
            "Товар определён!",
        ],
        "identify.retry" => [
            "We could not recognize that. Please try again.",
            "Bunu tanıyamadık. Lütfen tekrar deneyin.",
            "لم نتمكن من التعرف على ذلك. يرجى المحاولة مرة أخرى.",
            "Не удалось распознать. Попробуйте ещё раз.",
        ],

        // ── Overview ────────────────────────────────────────
        "overview.startAssembly" => ["Start assembly", "Kuruluma başla", "ابدأ التركيب", "Начать сборку"],
        "overview.openChatbot" => [
            "Ask the assistant",
            "Asistana sor",
            "اسأل المساعد",
            "Спросить ассистента",
        ],
        "overview.careTips" => ["Care tips", "Bakım önerileri", "نصائح العناية", "Советы по уходу"],
        "overview.replacementParts" => [
            "Replacement parts",
            "Yedek parçalar",
            "قطع الغيار",
            "Запасные части",
        ],

        // ── Guide ───────────────────────────────────────────
        "guide.stepOf" => [
            "Step {{current}} of {{total}}",
            "Adım {{current}} / {{total}}",
            "الخطوة {{current}} من {{total}}",
            "Шаг {{current}} из {{total}}",
        ],
        "guide.tabs.3d" => ["3D", "3B", "ثلاثي الأبعاد", "3D"],
        "guide.tabs.video" => ["Video", "Video", "فيديو", "Видео"],
        "guide.tabs.image" => ["Image", "Görsel", "صورة", "Изображение"],
        "guide.aiAssistant" => ["AI Assistant", "Yapay Zeka Asistanı", "المساعد الذكي", "ИИ-ассистент"],
        "guide.uploadPhoto" => [
            "Upload a progress photo",
            "İlerleme fotoğrafı yükle",
            "ارفع صورة للتقدم",
            "Загрузить фото прогресса",
        ],
        "guide.escalateHuman" => [
            "Talk to a person",
            "Bir temsilciyle konuş",
            "تحدث إلى موظف",
            "Связаться с оператором",
        ],
        "guide.completeAssembly" => [
            "Complete Assembly",
            "Kurulumu Tamamla",
            "إنهاء التركيب",
            "Завершить сборку",
        ],

        // ── Complete ────────────────────────────────────────
        "complete.title" => [
            "Assembly complete!",
            "Kurulum tamamlandı!",
            "اكتمل التركيب!",
            "Сборка завершена!",
        ],
        "complete.downloadSummary" => [
            "Download summary",
            "Özeti indir",
            "تنزيل الملخص",
            "Скачать отчёт",
        ],
        "complete.careTips" => ["Care tips", "Bakım önerileri", "نصائح العناية", "Советы по уходу"],
        "complete.replacementParts" => [
            "Replacement parts",
            "Yedek parçalar",
            "قطع الغيار",
            "Запасные части",
        ],

        // ── Chatbot ─────────────────────────────────────────
        "chatbot.welcome" => [
            "Hi! I'm your assembly assistant. Ask me about the current step, tools, time or safety.",
            "Merhaba! Ben kurulum asistanınızım. Mevcut adım, aletler, süre veya güvenlik hakkında sorabilirsiniz.",
            "مرحبًا! أنا مساعد التركيب. اسألني عن الخطوة الحالية أو الأدوات أو الوقت أو السلامة.",
            "Привет! Я ваш помощник по сборке. Спрашивайте о текущем шаге, инструментах, времени или безопасности.",
        ],
        "chatbot.progress" => [
            "You're on Step {{step}} of {{total}}.",
            "{{total}} adımın {{step}}. adımındasınız.",
            "أنت في الخطوة {{step}} من {{total}}.",
            "Вы на шаге {{step}} из {{total}}.",
        ],

        _ => return key,
    };
    pick(lang, entry)
}

/// Translate a key and fill `{{name}}` placeholders.
pub fn t_with(lang: Language, key: &str, args: &[(&str, String)]) -> String {
    args.iter().fold(t(lang, key).to_string(), |text, (name, value)| {
        text.replace(&format!("{{{{{name}}}}}"), value)
    })
}
